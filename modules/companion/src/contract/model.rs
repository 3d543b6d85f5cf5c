use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Calendar day the usage counter is scoped to (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Day key of `now` as seen from a fixed UTC offset.
    pub fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(now.with_timezone(&offset).date_naive())
    }

    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Usage accumulated by one user under one day key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub date: DayKey,
    pub time_spent_seconds: u64,
}

/// Point-in-time view of the daily budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub day: DayKey,
    pub time_spent_seconds: u64,
    pub daily_limit_seconds: u64,
}

impl UsageSnapshot {
    pub fn remaining_seconds(&self) -> u64 {
        self.daily_limit_seconds
            .saturating_sub(self.time_spent_seconds)
    }

    pub fn is_locked(&self) -> bool {
        self.time_spent_seconds >= self.daily_limit_seconds
    }
}

/// Usage as far as the gate can tell. `Unknown` means persistence could not
/// be read; callers show a loading state instead of granting or denying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageStatus {
    Known(UsageSnapshot),
    Unknown,
}

impl UsageStatus {
    pub fn snapshot(&self) -> Option<&UsageSnapshot> {
        match self {
            Self::Known(s) => Some(s),
            Self::Unknown => None,
        }
    }
}

/// Read-side journal entry as handed to mood analysis and the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JournalEntry {
    /// Creation time, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub date: String,
    pub mood: String,
    pub content: String,
}

/// Bounded, newest-first view of a user's journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntries {
    pub entries: Vec<JournalEntry>,
}

/// Data for recording a new journal entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    pub mood: String,
    pub content: String,
}

/// Voice-clone state persisted on the user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub user_id: String,
    pub voice_id: Option<String>,
    pub sample_url: Option<String>,
}

/// Named audio sample to clone a voice from, as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCloneRequest {
    pub name: String,
    pub audio_data_uri: String,
}
