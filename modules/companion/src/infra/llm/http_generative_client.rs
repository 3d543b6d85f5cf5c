//! Adapter for a `generateContent`-style hosted model API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::ports::{GenerativeModel, RenderedPrompt};
use crate::infra::http::TracedClient;

const SERVICE: &str = "generative_model";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct HttpGenerativeClient {
    client: TracedClient,
    base_url: Url,
    model: String,
    api_key: String,
}

impl HttpGenerativeClient {
    pub fn new(
        client: TracedClient,
        base_url: Url,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> Result<Url, DomainError> {
        let method = format!("{}:generateContent", self.model);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::upstream(SERVICE, "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["v1beta", "models", method.as_str()]);
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a RenderedPrompt) -> Self {
        let mut parts = vec![Part::Text { text: &prompt.text }];
        if let Some(media) = &prompt.media {
            parts.push(Part::Inline {
                inline_data: InlineData {
                    mime_type: &media.mime_type,
                    data: &media.data_base64,
                },
            });
        }
        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[async_trait]
impl GenerativeModel for HttpGenerativeClient {
    #[instrument(
        name = "companion.http.generative.generate",
        skip_all,
        fields(flow = prompt.flow, model = %self.model)
    )]
    async fn generate(&self, prompt: &RenderedPrompt) -> Result<String, DomainError> {
        let url = self.endpoint()?;
        let req = self
            .client
            .request(reqwest::Method::POST, url.as_str())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
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
            debug!(%status, body = %body, "Model call rejected");
            return Err(DomainError::upstream(SERVICE, format!("HTTP {}", status)));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(SERVICE, format!("unreadable response: {}", e)))?;
        payload
            .into_text()
            .ok_or_else(|| DomainError::upstream(SERVICE, "response has no text candidate"))
    }
}
