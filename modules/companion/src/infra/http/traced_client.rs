//! Outgoing HTTP with one span per request.
//!
//! Every call made by the model and voice adapters goes through
//! [`TracedClient::execute`], which opens an `outgoing_http` span carrying
//! the method, the URL without its query string, and the response status.

use std::time::Duration;

use tracing::{field, Instrument, Level};

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Client with a whole-request timeout.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(inner))
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %redacted(req.url()),
            otel.kind = "client",
            http.status_code = field::Empty,
            error = field::Empty,
        );

        let inner = self.inner.clone();
        let record_on = span.clone();
        async move {
            let response = inner.execute(req).await.inspect_err(|_| {
                record_on.record("error", true);
            })?;

            record_on.record("http.status_code", response.status().as_u16());
            if response.status().is_client_error() || response.status().is_server_error() {
                record_on.record("error", true);
                tracing::debug!(status = %response.status(), "Upstream returned an error status");
            }
            Ok::<_, reqwest::Error>(response)
        }
        .instrument(span)
        .await
    }

    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

// Query strings may carry credentials.
fn redacted(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn query_is_not_logged() {
        let url = reqwest::Url::parse("https://api.example.com/v1/x?key=secret").unwrap();
        assert_eq!(redacted(&url), "https://api.example.com/v1/x");
    }

    #[tokio::test]
    async fn executes_built_requests() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST).path("/ping");
                then.status(200).body("ok");
            })
            .await;

        let client = TracedClient::default();
        let req = client
            .request(reqwest::Method::POST, &format!("{}/ping", server.base_url()))
            .build()
            .unwrap();
        let resp = client.execute(req).await.unwrap();

        assert!(resp.status().is_success());
        m.assert_async().await;
    }
}
