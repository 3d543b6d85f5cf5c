use serde::{Deserialize, Serialize};

use crate::contract::flows::JournalAnalysis;
use crate::contract::model::{
    JournalEntry, NewJournalEntry, RecentEntries, UsageStatus, VoiceCloneRequest, VoiceProfile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageState {
    Known,
    Unknown,
}

/// REST DTO for the daily usage budget. Counters are absent while unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDto {
    pub state: UsageState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordActivityReq {
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryDto {
    pub date: String,
    pub mood: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEntriesDto {
    pub entries: Vec<JournalEntryDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryReq {
    #[serde(default)]
    pub mood: String,
    pub content: String,
}

/// `analysis` is null when the user has no journal history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodAnalysisDto {
    pub analysis: Option<JournalAnalysis>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionReq {
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloneVoiceReq {
    pub name: String,
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProfileDto {
    pub user_id: String,
    pub voice_id: Option<String>,
    pub sample_url: Option<String>,
}

impl From<UsageStatus> for UsageDto {
    fn from(status: UsageStatus) -> Self {
        match status {
            UsageStatus::Known(s) => Self {
                state: UsageState::Known,
                day: Some(s.day.to_string()),
                time_spent_seconds: Some(s.time_spent_seconds),
                daily_limit_seconds: Some(s.daily_limit_seconds),
                remaining_seconds: Some(s.remaining_seconds()),
                locked: Some(s.is_locked()),
            },
            UsageStatus::Unknown => Self {
                state: UsageState::Unknown,
                day: None,
                time_spent_seconds: None,
                daily_limit_seconds: None,
                remaining_seconds: None,
                locked: None,
            },
        }
    }
}

impl From<JournalEntry> for JournalEntryDto {
    fn from(entry: JournalEntry) -> Self {
        Self {
            date: entry.date,
            mood: entry.mood,
            content: entry.content,
        }
    }
}

impl From<RecentEntries> for RecentEntriesDto {
    fn from(recent: RecentEntries) -> Self {
        Self {
            entries: recent.entries.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateEntryReq> for NewJournalEntry {
    fn from(req: CreateEntryReq) -> Self {
        Self {
            mood: req.mood,
            content: req.content,
        }
    }
}

impl From<CloneVoiceReq> for VoiceCloneRequest {
    fn from(req: CloneVoiceReq) -> Self {
        Self {
            name: req.name,
            audio_data_uri: req.audio_data_uri,
        }
    }
}

impl From<VoiceProfile> for VoiceProfileDto {
    fn from(profile: VoiceProfile) -> Self {
        Self {
            user_id: profile.user_id,
            voice_id: profile.voice_id,
            sample_url: profile.sample_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{DayKey, UsageSnapshot};
    use serde_json::json;

    #[test]
    fn known_usage_serializes_counters() {
        let dto = UsageDto::from(UsageStatus::Known(UsageSnapshot {
            day: DayKey::parse("2024-03-01").unwrap(),
            time_spent_seconds: 3700,
            daily_limit_seconds: 3600,
        }));
        assert_eq!(
            serde_json::to_value(dto).unwrap(),
            json!({
                "state": "known",
                "day": "2024-03-01",
                "time_spent_seconds": 3700,
                "daily_limit_seconds": 3600,
                "remaining_seconds": 0,
                "locked": true
            })
        );
    }

    #[test]
    fn unknown_usage_has_no_counters() {
        let dto = UsageDto::from(UsageStatus::Unknown);
        assert_eq!(serde_json::to_value(dto).unwrap(), json!({"state": "unknown"}));
    }
}
