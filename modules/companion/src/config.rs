use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;
use crate::domain::usage::{UsageConfig, DEFAULT_DAILY_LIMIT_SECS, DEFAULT_MAX_TICK_SECS};

/// Configuration for the companion module (`modules.companion`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanionConfig {
    #[serde(default = "default_daily_limit_secs")]
    pub daily_limit_secs: u64,
    #[serde(default = "default_max_tick_secs")]
    pub max_tick_secs: u64,
    /// Where the usage day starts, in minutes east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Whole-request timeout for calls to the model and voice APIs.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub generative: GenerativeConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceConfig {
    #[serde(default = "default_voice_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Prefix of the download URLs handed out for uploaded objects.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            daily_limit_secs: default_daily_limit_secs(),
            max_tick_secs: default_max_tick_secs(),
            utc_offset_minutes: 0,
            http_timeout_secs: default_http_timeout_secs(),
            generative: GenerativeConfig::default(),
            voice: VoiceConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            base_url: default_generative_base_url(),
            model: default_model(),
            api_key: String::new(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_voice_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

impl CompanionConfig {
    pub fn to_service_config(&self) -> anyhow::Result<ServiceConfig> {
        if self.daily_limit_secs == 0 {
            anyhow::bail!("daily_limit_secs must be positive");
        }
        if self.max_tick_secs == 0 {
            anyhow::bail!("max_tick_secs must be positive");
        }
        let utc_offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                )
            })?;

        Ok(ServiceConfig {
            usage: UsageConfig {
                daily_limit_secs: self.daily_limit_secs,
                max_tick_secs: self.max_tick_secs,
                utc_offset,
            },
        })
    }
}

fn default_daily_limit_secs() -> u64 {
    DEFAULT_DAILY_LIMIT_SECS
}

fn default_max_tick_secs() -> u64 {
    DEFAULT_MAX_TICK_SECS
}

fn default_http_timeout_secs() -> u64 {
    60
}

fn default_generative_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_voice_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_public_base_url() -> String {
    "http://storage.local/companion".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: CompanionConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.daily_limit_secs, 3600);
        assert_eq!(cfg.max_tick_secs, 300);
        assert_eq!(cfg.generative.model, "gemini-2.0-flash");
        let svc = cfg.to_service_config().unwrap();
        assert_eq!(svc.usage.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_value::<CompanionConfig>(json!({"daily_limit": 10}));
        assert!(err.is_err());
    }

    #[test]
    fn offset_is_validated() {
        let cfg: CompanionConfig =
            serde_json::from_value(json!({"utc_offset_minutes": -300})).unwrap();
        assert_eq!(
            cfg.to_service_config().unwrap().usage.utc_offset.local_minus_utc(),
            -300 * 60
        );

        let cfg: CompanionConfig =
            serde_json::from_value(json!({"utc_offset_minutes": 24 * 60})).unwrap();
        assert!(cfg.to_service_config().is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let cfg: CompanionConfig =
            serde_json::from_value(json!({"daily_limit_secs": 0})).unwrap();
        assert!(cfg.to_service_config().is_err());
    }
}
