use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::contract::model::{VoiceCloneRequest, VoiceProfile};
use crate::domain::error::DomainError;
use crate::domain::events::CompanionEvent;
use crate::domain::media::DataUri;
use crate::domain::ports::{AudioSample, Clock, EventPublisher, ObjectStorage, VoiceCloner};
use crate::domain::repo::ProfileRepository;

const MAX_VOICE_NAME_CHARS: usize = 64;
const AUDIO_FIELD: &str = "audio_data_uri";

/// Clones a user's voice from an uploaded sample and remembers the result
/// on their profile.
pub struct VoiceService {
    storage: Arc<dyn ObjectStorage>,
    cloner: Arc<dyn VoiceCloner>,
    profiles: Arc<dyn ProfileRepository>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher<CompanionEvent>>,
}

impl VoiceService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        cloner: Arc<dyn VoiceCloner>,
        profiles: Arc<dyn ProfileRepository>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher<CompanionEvent>>,
    ) -> Self {
        Self {
            storage,
            cloner,
            profiles,
            clock,
            events,
        }
    }

    #[instrument(
        name = "companion.voice.clone_voice",
        skip(self, request),
        fields(voice_name = %request.name)
    )]
    pub async fn clone_voice(
        &self,
        user_id: &str,
        request: VoiceCloneRequest,
    ) -> Result<VoiceProfile, DomainError> {
        Self::validate_user_path_segment(user_id)?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_argument("name", "must not be empty"));
        }
        if name.chars().count() > MAX_VOICE_NAME_CHARS {
            return Err(DomainError::invalid_argument(
                "name",
                format!("longer than {} characters", MAX_VOICE_NAME_CHARS),
            ));
        }
        let uri = DataUri::parse_audio(AUDIO_FIELD, &request.audio_data_uri)?;
        let bytes = uri.decode(AUDIO_FIELD)?;

        let file_name = format!("{}.{}", Uuid::new_v4(), uri.extension());
        let path = format!("voice-samples/{}/{}", user_id, file_name);
        let sample_url = self
            .storage
            .upload_data_uri(&path, &request.audio_data_uri)
            .await?;

        let voice_id = self
            .cloner
            .clone_voice(
                name,
                AudioSample {
                    file_name,
                    mime_type: uri.mime_type,
                    bytes,
                },
            )
            .await?;

        self.profiles
            .save_voice(user_id, &voice_id, &sample_url)
            .await
            .map_err(|e| DomainError::upstream("document_store", e.to_string()))?;

        self.events.publish(&CompanionEvent::VoiceCloned {
            user_id: user_id.to_string(),
            voice_id: voice_id.clone(),
            at: self.clock.now(),
        });

        info!(%voice_id, "Voice cloned");
        Ok(VoiceProfile {
            user_id: user_id.to_string(),
            voice_id: Some(voice_id),
            sample_url: Some(sample_url),
        })
    }

    #[instrument(name = "companion.voice.voice_profile", skip(self))]
    pub async fn voice_profile(&self, user_id: &str) -> Result<VoiceProfile, DomainError> {
        DomainError::require_user_id(user_id)?;
        self.profiles
            .voice_profile(user_id)
            .await
            .map_err(|e| DomainError::upstream("document_store", e.to_string()))?
            .ok_or_else(|| DomainError::not_found("Voice profile", user_id))
    }

    // The user id becomes part of an object path.
    fn validate_user_path_segment(user_id: &str) -> Result<(), DomainError> {
        DomainError::require_user_id(user_id)?;
        if user_id.contains(['/', '\\'])
            || user_id.contains("..")
            || user_id.chars().any(char::is_control)
        {
            return Err(DomainError::invalid_argument(
                "user_id",
                "must not contain path separators or control characters",
            ));
        }
        Ok(())
    }
}
