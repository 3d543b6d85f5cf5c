use chrono::{DateTime, Utc};
use crate::contract::model::DayKey;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionEvent {
    /// The daily budget was crossed by the latest increment.
    UsageLimitReached {
        user_id: String,
        day: DayKey,
        at: DateTime<Utc>,
    },
    JournalEntryRecorded {
        user_id: String,
        entry_id: String,
        at: DateTime<Utc>,
    },
    VoiceCloned {
        user_id: String,
        voice_id: String,
        at: DateTime<Utc>,
    },
}
