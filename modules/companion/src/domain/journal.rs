use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{JournalEntry, NewJournalEntry, RecentEntries};
use crate::domain::error::DomainError;
use crate::domain::events::CompanionEvent;
use crate::domain::ports::{Clock, EventPublisher};
use crate::domain::repo::{JournalRepository, StoredJournalEntry};

/// Upper bound on entries handed to mood analysis. Keeps prompt context
/// bounded; not configurable.
pub const RECENT_ENTRIES_LIMIT: usize = 20;

pub const UNKNOWN_MOOD: &str = "Unknown";
pub const NO_CONTENT: &str = "No content";

/// UTC, zero-padded, so lexical order of `date` equals chronological order.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct JournalService {
    repo: Arc<dyn JournalRepository>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher<CompanionEvent>>,
}

impl JournalService {
    pub fn new(
        repo: Arc<dyn JournalRepository>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher<CompanionEvent>>,
    ) -> Self {
        Self {
            repo,
            clock,
            events,
        }
    }

    /// Newest-first view of the user's last entries.
    ///
    /// A failing store yields an empty result: "no history" and "query failed"
    /// look the same to callers.
    #[instrument(name = "companion.journal.fetch_recent_entries", skip(self))]
    pub async fn fetch_recent_entries(&self, user_id: &str) -> Result<RecentEntries, DomainError> {
        DomainError::require_user_id(user_id)?;

        let mut stored = match self
            .repo
            .recent_for_user(user_id, RECENT_ENTRIES_LIMIT)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Journal query failed, returning no history");
                return Ok(RecentEntries::default());
            }
        };

        stored.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        stored.truncate(RECENT_ENTRIES_LIMIT);

        debug!("Fetched {} journal entries", stored.len());
        Ok(RecentEntries {
            entries: stored.iter().map(to_entry).collect(),
        })
    }

    #[instrument(name = "companion.journal.record_entry", skip(self, entry))]
    pub async fn record_entry(
        &self,
        user_id: &str,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, DomainError> {
        DomainError::require_user_id(user_id)?;
        if entry.content.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "content",
                "must not be empty",
            ));
        }

        let stored = StoredJournalEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            mood: Some(entry.mood.trim().to_string()).filter(|m| !m.is_empty()),
            content: Some(entry.content),
            created_at: self.clock.now(),
        };

        self.repo
            .insert(stored.clone())
            .await
            .map_err(|e| DomainError::upstream("document_store", e.to_string()))?;

        self.events.publish(&CompanionEvent::JournalEntryRecorded {
            user_id: stored.user_id.clone(),
            entry_id: stored.id.clone(),
            at: stored.created_at,
        });

        info!(entry_id = %stored.id, "Recorded journal entry");
        Ok(to_entry(&stored))
    }
}

fn to_entry(stored: &StoredJournalEntry) -> JournalEntry {
    JournalEntry {
        date: stored.created_at.format(DATE_FORMAT).to_string(),
        mood: non_empty(&stored.mood).unwrap_or(UNKNOWN_MOOD).to_string(),
        content: non_empty(&stored.content).unwrap_or(NO_CONTENT).to_string(),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
