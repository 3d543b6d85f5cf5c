use async_trait::async_trait;

use crate::contract::{
    error::CompanionError,
    flows::{FlowRequest, FlowResponse, JournalAnalysis},
    model::{
        JournalEntry, NewJournalEntry, RecentEntries, UsageStatus, VoiceCloneRequest, VoiceProfile,
    },
};

/// Public API trait for the companion module that other modules can use
#[async_trait]
pub trait CompanionApi: Send + Sync {
    /// Current daily usage for a user
    async fn usage_status(&self, user_id: &str) -> Result<UsageStatus, CompanionError>;

    /// Add `elapsed_secs` of foreground time to today's counter
    async fn record_activity(
        &self,
        user_id: &str,
        elapsed_secs: u64,
    ) -> Result<UsageStatus, CompanionError>;

    /// Last 20 journal entries, newest first
    async fn recent_entries(&self, user_id: &str) -> Result<RecentEntries, CompanionError>;

    /// Store a new journal entry
    async fn record_entry(
        &self,
        user_id: &str,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, CompanionError>;

    /// Run a model-backed flow
    async fn dispatch(&self, request: FlowRequest) -> Result<FlowResponse, CompanionError>;

    /// Mood analysis over recent journal history; `None` when there is no history
    async fn analyze_recent_mood(
        &self,
        user_id: &str,
    ) -> Result<Option<JournalAnalysis>, CompanionError>;

    /// Transcribe a spoken journal entry and store it
    async fn transcribe_and_record(
        &self,
        user_id: &str,
        audio_data_uri: &str,
    ) -> Result<JournalEntry, CompanionError>;

    /// Clone the user's voice from a sample and remember the voice id
    async fn clone_voice(
        &self,
        user_id: &str,
        request: VoiceCloneRequest,
    ) -> Result<VoiceProfile, CompanionError>;

    /// Stored voice-clone state of a user
    async fn voice_profile(&self, user_id: &str) -> Result<VoiceProfile, CompanionError>;
}
