//! `data:` URI handling for uploaded audio.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::error::DomainError;

/// A parsed base64 `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data_base64: String,
}

impl DataUri {
    /// Parse `data:<mime>;base64,<payload>`. Only base64 payloads are accepted.
    pub fn parse(field: &str, raw: &str) -> Result<Self, DomainError> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| DomainError::invalid_argument(field, "expected a data: URI"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| DomainError::invalid_argument(field, "missing payload separator"))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| DomainError::invalid_argument(field, "payload must be base64"))?;
        // Parameters such as `;codecs=opus` are not part of the media type.
        let mime_type = mime_type.split(';').next().unwrap_or_default().trim();
        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(DomainError::invalid_argument(field, "missing media type"));
        }
        if payload.is_empty() {
            return Err(DomainError::invalid_argument(field, "empty payload"));
        }
        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            data_base64: payload.to_string(),
        })
    }

    /// Like `parse`, additionally requiring an `audio/*` media type.
    pub fn parse_audio(field: &str, raw: &str) -> Result<Self, DomainError> {
        let uri = Self::parse(field, raw)?;
        if !uri.mime_type.starts_with("audio/") {
            return Err(DomainError::invalid_argument(
                field,
                format!("expected audio, got {}", uri.mime_type),
            ));
        }
        Ok(uri)
    }

    pub fn decode(&self, field: &str) -> Result<Vec<u8>, DomainError> {
        STANDARD
            .decode(self.data_base64.as_bytes())
            .map_err(|e| DomainError::invalid_argument(field, format!("invalid base64: {}", e)))
    }

    /// File extension for the media type, used when naming stored objects.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/ogg" => "ogg",
            "audio/webm" => "webm",
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
            "audio/flac" => "flac",
            _ => "bin",
        }
    }
}
