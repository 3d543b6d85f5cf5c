use async_trait::async_trait;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSample {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Port for the third-party voice-cloning API.
#[async_trait]
pub trait VoiceCloner: Send + Sync {
    /// Returns the opaque voice id assigned by the provider.
    async fn clone_voice(&self, name: &str, sample: AudioSample) -> Result<String, DomainError>;
}
