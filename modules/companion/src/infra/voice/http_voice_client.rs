use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::ports::{AudioSample, VoiceCloner};
use crate::infra::http::TracedClient;

const SERVICE: &str = "voice_cloning";
const API_KEY_HEADER: &str = "xi-api-key";

/// Client for an instant voice cloning API (`POST /v1/voices/add`).
pub struct HttpVoiceCloner {
    client: TracedClient,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AddVoiceResponse {
    voice_id: String,
}

impl HttpVoiceCloner {
    pub fn new(client: TracedClient, base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::upstream(SERVICE, "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["v1", "voices", "add"]);
        Ok(url)
    }
}

#[async_trait]
impl VoiceCloner for HttpVoiceCloner {
    #[instrument(
        name = "companion.http.voice.clone_voice",
        skip_all,
        fields(size = sample.bytes.len())
    )]
    async fn clone_voice(&self, name: &str, sample: AudioSample) -> Result<String, DomainError> {
        let file = Part::bytes(sample.bytes)
            .file_name(sample.file_name)
            .mime_str(&sample.mime_type)
            .map_err(|e| DomainError::upstream(SERVICE, format!("bad sample media type: {}", e)))?;
        let form = Form::new().text("name", name.to_string()).part("files", file);

        let req = self
            .client
            .request(reqwest::Method::POST, self.endpoint()?.as_str())
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .build()
            .map_err(|e| DomainError::upstream(SERVICE, format!("request build: {}", e)))?;

        let response = self
            .client
            .execute(req)
            .await
            .map_err(|e| DomainError::upstream(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %body, "Voice cloning rejected");
            return Err(DomainError::upstream(SERVICE, format!("HTTP {}", status)));
        }

        let added: AddVoiceResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(SERVICE, format!("unreadable response: {}", e)))?;
        if added.voice_id.trim().is_empty() {
            return Err(DomainError::upstream(SERVICE, "empty voice_id"));
        }
        Ok(added.voice_id)
    }
}
