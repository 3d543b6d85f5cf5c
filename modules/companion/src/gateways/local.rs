use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::CompanionApi,
    error::CompanionError,
    flows::{FlowRequest, FlowResponse, JournalAnalysis},
    model::{
        JournalEntry, NewJournalEntry, RecentEntries, UsageStatus, VoiceCloneRequest, VoiceProfile,
    },
};
use crate::domain::service::Service;

/// Local implementation of the CompanionApi trait that delegates to the domain service
pub struct CompanionLocalClient {
    service: Arc<Service>,
}

impl CompanionLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CompanionApi for CompanionLocalClient {
    async fn usage_status(&self, user_id: &str) -> Result<UsageStatus, CompanionError> {
        self.service
            .usage_status(user_id)
            .await
            .map_err(Into::into)
    }

    async fn record_activity(
        &self,
        user_id: &str,
        elapsed_secs: u64,
    ) -> Result<UsageStatus, CompanionError> {
        self.service
            .record_activity(user_id, elapsed_secs)
            .await
            .map_err(Into::into)
    }

    async fn recent_entries(&self, user_id: &str) -> Result<RecentEntries, CompanionError> {
        self.service
            .fetch_recent_entries(user_id)
            .await
            .map_err(Into::into)
    }

    async fn record_entry(
        &self,
        user_id: &str,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, CompanionError> {
        self.service
            .record_entry(user_id, entry)
            .await
            .map_err(Into::into)
    }

    async fn dispatch(&self, request: FlowRequest) -> Result<FlowResponse, CompanionError> {
        self.service.dispatch(request).await.map_err(Into::into)
    }

    async fn analyze_recent_mood(
        &self,
        user_id: &str,
    ) -> Result<Option<JournalAnalysis>, CompanionError> {
        self.service
            .analyze_recent_mood(user_id)
            .await
            .map_err(Into::into)
    }

    async fn transcribe_and_record(
        &self,
        user_id: &str,
        audio_data_uri: &str,
    ) -> Result<JournalEntry, CompanionError> {
        self.service
            .transcribe_and_record(user_id, audio_data_uri)
            .await
            .map_err(Into::into)
    }

    async fn clone_voice(
        &self,
        user_id: &str,
        request: VoiceCloneRequest,
    ) -> Result<VoiceProfile, CompanionError> {
        self.service
            .clone_voice(user_id, request)
            .await
            .map_err(Into::into)
    }

    async fn voice_profile(&self, user_id: &str) -> Result<VoiceProfile, CompanionError> {
        self.service
            .voice_profile(user_id)
            .await
            .map_err(Into::into)
    }
}
