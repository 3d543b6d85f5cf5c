use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::contract::model::{UsageRecord, VoiceProfile};

/// Journal document as persisted. Older documents may lack mood or content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredJournalEntry {
    pub id: String,
    pub user_id: String,
    pub mood: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Port for the domain layer: journal persistence.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Entries of `user_id`, newest first, at most `limit`.
    async fn recent_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredJournalEntry>>;
    async fn insert(&self, entry: StoredJournalEntry) -> anyhow::Result<()>;
}

/// Port for the per-user, per-day usage counter.
#[async_trait]
pub trait UsageRepository: Send + Sync {
    async fn load(&self, user_id: &str) -> anyhow::Result<Option<UsageRecord>>;
    /// Overwrite the user's record. Callers serialize writes per user.
    async fn store(&self, user_id: &str, record: &UsageRecord) -> anyhow::Result<()>;
}

/// Port for the user profile fields this module owns.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn voice_profile(&self, user_id: &str) -> anyhow::Result<Option<VoiceProfile>>;
    async fn save_voice(
        &self,
        user_id: &str,
        voice_id: &str,
        sample_url: &str,
    ) -> anyhow::Result<()>;
}
