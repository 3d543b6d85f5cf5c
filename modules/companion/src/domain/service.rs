use std::sync::Arc;

use tracing::{debug, instrument};

use crate::contract::flows::{
    FlowRequest, FlowResponse, JournalAnalysis, JournalAnalysisInput, TranscriptionInput,
};
use crate::contract::model::{
    JournalEntry, NewJournalEntry, RecentEntries, UsageStatus, VoiceCloneRequest, VoiceProfile,
};
use crate::domain::error::DomainError;
use crate::domain::events::CompanionEvent;
use crate::domain::flows::{AnalyzeJournal, FlowDispatcher, TranscribeJournal};
use crate::domain::journal::JournalService;
use crate::domain::ports::{Clock, EventPublisher, GenerativeModel, ObjectStorage, VoiceCloner};
use crate::domain::repo::{JournalRepository, ProfileRepository, UsageRepository};
use crate::domain::usage::{UsageConfig, UsageGate};
use crate::domain::voice::VoiceService;

/// Everything the domain talks to, constructed by the caller.
#[derive(Clone)]
pub struct Ports {
    pub journal: Arc<dyn JournalRepository>,
    pub usage: Arc<dyn UsageRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub model: Arc<dyn GenerativeModel>,
    pub storage: Arc<dyn ObjectStorage>,
    pub voice: Arc<dyn VoiceCloner>,
    pub clock: Arc<dyn Clock>,
    pub events: Arc<dyn EventPublisher<CompanionEvent>>,
}

/// Configuration for the domain service
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub usage: UsageConfig,
}

/// Domain service facade. Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    usage: Arc<UsageGate>,
    journal: Arc<JournalService>,
    flows: Arc<FlowDispatcher>,
    voice: Arc<VoiceService>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(ports: Ports, config: ServiceConfig) -> Self {
        Self {
            usage: Arc::new(UsageGate::new(
                ports.usage,
                ports.clock.clone(),
                ports.events.clone(),
                config.usage,
            )),
            journal: Arc::new(JournalService::new(
                ports.journal,
                ports.clock.clone(),
                ports.events.clone(),
            )),
            flows: Arc::new(FlowDispatcher::new(ports.model)),
            voice: Arc::new(VoiceService::new(
                ports.storage,
                ports.voice,
                ports.profiles,
                ports.clock,
                ports.events,
            )),
        }
    }

    pub async fn usage_status(&self, user_id: &str) -> Result<UsageStatus, DomainError> {
        self.usage.status(user_id).await
    }

    pub async fn record_activity(
        &self,
        user_id: &str,
        elapsed_secs: u64,
    ) -> Result<UsageStatus, DomainError> {
        self.usage.record_activity(user_id, elapsed_secs).await
    }

    pub async fn fetch_recent_entries(&self, user_id: &str) -> Result<RecentEntries, DomainError> {
        self.journal.fetch_recent_entries(user_id).await
    }

    pub async fn record_entry(
        &self,
        user_id: &str,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, DomainError> {
        self.journal.record_entry(user_id, entry).await
    }

    pub async fn dispatch(&self, request: FlowRequest) -> Result<FlowResponse, DomainError> {
        self.flows.dispatch(request).await
    }

    /// Mood analysis over the user's recent journal. Returns `None` without
    /// calling the model when there is no usable history.
    #[instrument(name = "companion.service.analyze_recent_mood", skip(self))]
    pub async fn analyze_recent_mood(
        &self,
        user_id: &str,
    ) -> Result<Option<JournalAnalysis>, DomainError> {
        let recent = self.journal.fetch_recent_entries(user_id).await?;
        if recent.entries.is_empty() {
            debug!("No journal history, skipping mood analysis");
            return Ok(None);
        }
        let input = JournalAnalysisInput {
            entries: recent.entries,
        };
        self.flows.run::<AnalyzeJournal>(&input).await.map(Some)
    }

    /// Transcribe a spoken entry and store the result as a journal entry.
    #[instrument(name = "companion.service.transcribe_and_record", skip(self, audio_data_uri))]
    pub async fn transcribe_and_record(
        &self,
        user_id: &str,
        audio_data_uri: &str,
    ) -> Result<JournalEntry, DomainError> {
        DomainError::require_user_id(user_id)?;
        let input = TranscriptionInput {
            audio_data_uri: audio_data_uri.to_string(),
        };
        let transcribed = self.flows.run::<TranscribeJournal>(&input).await?;
        self.journal
            .record_entry(
                user_id,
                NewJournalEntry {
                    mood: transcribed.mood,
                    content: transcribed.content,
                },
            )
            .await
    }

    pub async fn clone_voice(
        &self,
        user_id: &str,
        request: VoiceCloneRequest,
    ) -> Result<VoiceProfile, DomainError> {
        self.voice.clone_voice(user_id, request).await
    }

    pub async fn voice_profile(&self, user_id: &str) -> Result<VoiceProfile, DomainError> {
        self.voice.voice_profile(user_id).await
    }
}
