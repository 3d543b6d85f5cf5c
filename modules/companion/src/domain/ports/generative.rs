use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Inline media attached to a prompt (base64 payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    pub mime_type: String,
    pub data_base64: String,
}

/// A fully rendered flow prompt, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub flow: &'static str,
    pub text: String,
    /// JSON schema the answer must conform to.
    pub response_schema: serde_json::Value,
    pub media: Option<MediaPart>,
}

/// Port for the hosted generative model. Returns the raw answer text;
/// parsing against the flow's output schema happens in the dispatcher.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &RenderedPrompt) -> Result<String, DomainError>;
}
