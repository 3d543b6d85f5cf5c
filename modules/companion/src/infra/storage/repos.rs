//! Domain repositories over a [`DocumentStore`].
//!
//! Field names follow the document layout shared with the client apps:
//! camelCase keys. Journal timestamps are written as epoch milliseconds;
//! older documents may still carry RFC 3339 text.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tracing::warn;

use crate::contract::model::{DayKey, UsageRecord, VoiceProfile};
use crate::domain::ports::{Direction, Document, DocumentSnapshot, DocumentStore, Query};
use crate::domain::repo::{
    JournalRepository, ProfileRepository, StoredJournalEntry, UsageRepository,
};

pub const JOURNAL_COLLECTION: &str = "journalEntries";
pub const USAGE_COLLECTION: &str = "usage";
pub const USERS_COLLECTION: &str = "users";

fn into_document(value: Value) -> anyhow::Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected a JSON object, got {}", other),
    }
}

fn str_field(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Accepts RFC 3339 strings and epoch milliseconds.
fn timestamp_field(doc: &Document, field: &str) -> Option<DateTime<Utc>> {
    match doc.get(field)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

pub struct DocumentJournalRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentJournalRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn from_snapshot(snapshot: DocumentSnapshot) -> Option<StoredJournalEntry> {
        let Some(created_at) = timestamp_field(&snapshot.data, "createdAt") else {
            warn!(entry_id = %snapshot.id, "Skipping journal entry with unreadable createdAt");
            return None;
        };
        Some(StoredJournalEntry {
            user_id: str_field(&snapshot.data, "userId").unwrap_or_default(),
            mood: str_field(&snapshot.data, "mood"),
            content: str_field(&snapshot.data, "content"),
            created_at,
            id: snapshot.id,
        })
    }
}

#[async_trait]
impl JournalRepository for DocumentJournalRepository {
    async fn recent_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredJournalEntry>> {
        let query = Query::collection(JOURNAL_COLLECTION)
            .where_eq("userId", user_id)
            .order_by("createdAt", Direction::Descending)
            .limit(limit);
        let snapshots = self
            .store
            .query(&query)
            .await
            .context("journal query failed")?;
        Ok(snapshots
            .into_iter()
            .filter_map(Self::from_snapshot)
            .collect())
    }

    async fn insert(&self, entry: StoredJournalEntry) -> anyhow::Result<()> {
        let doc = into_document(json!({
            "userId": entry.user_id,
            "mood": entry.mood,
            "content": entry.content,
            "createdAt": entry.created_at.timestamp_millis(),
        }))?;
        self.store
            .insert(JOURNAL_COLLECTION, &entry.id, doc)
            .await
            .with_context(|| format!("failed to insert journal entry {}", entry.id))
    }
}

/// One document per user, id = user id, holding the counter of the current day.
pub struct DocumentUsageRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentUsageRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UsageRepository for DocumentUsageRepository {
    async fn load(&self, user_id: &str) -> anyhow::Result<Option<UsageRecord>> {
        let Some(doc) = self
            .store
            .get(USAGE_COLLECTION, user_id)
            .await
            .context("usage read failed")?
        else {
            return Ok(None);
        };

        let date = str_field(&doc, "date").and_then(|d| DayKey::parse(&d));
        let spent = doc.get("timeSpentSeconds").and_then(Value::as_u64);
        match (date, spent) {
            (Some(date), Some(time_spent_seconds)) => Ok(Some(UsageRecord {
                date,
                time_spent_seconds,
            })),
            // Treated as absent so the next write replaces it.
            _ => {
                warn!(%user_id, "Ignoring malformed usage document");
                Ok(None)
            }
        }
    }

    async fn store(&self, user_id: &str, record: &UsageRecord) -> anyhow::Result<()> {
        let doc = into_document(json!({
            "date": record.date.to_string(),
            "timeSpentSeconds": record.time_spent_seconds,
        }))?;
        self.store
            .set(USAGE_COLLECTION, user_id, doc, false)
            .await
            .context("usage write failed")
    }
}

pub struct DocumentProfileRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentProfileRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileRepository for DocumentProfileRepository {
    async fn voice_profile(&self, user_id: &str) -> anyhow::Result<Option<VoiceProfile>> {
        let doc = self
            .store
            .get(USERS_COLLECTION, user_id)
            .await
            .context("profile read failed")?;
        Ok(doc.map(|doc| VoiceProfile {
            user_id: user_id.to_string(),
            voice_id: str_field(&doc, "voiceId"),
            sample_url: str_field(&doc, "voiceSampleUrl"),
        }))
    }

    async fn save_voice(
        &self,
        user_id: &str,
        voice_id: &str,
        sample_url: &str,
    ) -> anyhow::Result<()> {
        let doc = into_document(json!({
            "voiceId": voice_id,
            "voiceSampleUrl": sample_url,
        }))?;
        self.store
            .set(USERS_COLLECTION, user_id, doc, true)
            .await
            .context("profile write failed")
    }
}
