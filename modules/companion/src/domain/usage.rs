//! Daily usage budget.
//!
//! The gate keeps one counter per user, scoped to a day key computed from the
//! server clock. Clients report elapsed foreground time in ticks; the counter
//! for the current day only ever grows, and a record left over from an earlier
//! day is treated as zero and overwritten on the next increment.
//!
//! Increments for one user are serialized by an in-process lock. Two server
//! processes incrementing the same user can still race (last write wins);
//! given monotonic increments the worst case is a lost tick, which is accepted.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{DayKey, UsageRecord, UsageSnapshot, UsageStatus};
use crate::domain::error::DomainError;
use crate::domain::events::CompanionEvent;
use crate::domain::ports::{Clock, EventPublisher};
use crate::domain::repo::UsageRepository;

pub const DEFAULT_DAILY_LIMIT_SECS: u64 = 3600;
pub const DEFAULT_MAX_TICK_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct UsageConfig {
    pub daily_limit_secs: u64,
    /// Largest increment a single tick may report.
    pub max_tick_secs: u64,
    /// Offset used to decide where a calendar day starts.
    pub utc_offset: FixedOffset,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            daily_limit_secs: DEFAULT_DAILY_LIMIT_SECS,
            max_tick_secs: DEFAULT_MAX_TICK_SECS,
            utc_offset: Utc.fix(),
        }
    }
}

pub struct UsageGate {
    repo: Arc<dyn UsageRepository>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher<CompanionEvent>>,
    config: UsageConfig,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl UsageGate {
    pub fn new(
        repo: Arc<dyn UsageRepository>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher<CompanionEvent>>,
        config: UsageConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            events,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn today(&self) -> DayKey {
        DayKey::at(self.clock.now(), self.config.utc_offset)
    }

    #[instrument(name = "companion.usage.status", skip(self))]
    pub async fn status(&self, user_id: &str) -> Result<UsageStatus, DomainError> {
        DomainError::require_user_id(user_id)?;

        let today = self.today();
        let spent = match self.repo.load(user_id).await {
            Ok(Some(record)) if record.date == today => record.time_spent_seconds,
            Ok(_) => 0,
            Err(e) => {
                warn!(error = %e, "Usage read failed, reporting unknown");
                return Ok(UsageStatus::Unknown);
            }
        };
        Ok(UsageStatus::Known(self.snapshot(today, spent)))
    }

    #[instrument(name = "companion.usage.record_activity", skip(self))]
    pub async fn record_activity(
        &self,
        user_id: &str,
        elapsed_secs: u64,
    ) -> Result<UsageStatus, DomainError> {
        DomainError::require_user_id(user_id)?;
        if elapsed_secs > self.config.max_tick_secs {
            return Err(DomainError::invalid_argument(
                "elapsed_secs",
                format!(
                    "{} exceeds the per-tick maximum of {}",
                    elapsed_secs, self.config.max_tick_secs
                ),
            ));
        }
        if elapsed_secs == 0 {
            return self.status(user_id).await;
        }

        let lock = self.lock_for(user_id);
        let status = {
            let _guard = lock.lock().await;
            self.increment(user_id, elapsed_secs).await
        };
        drop(lock);
        self.release_lock(user_id);
        status
    }

    // Read-modify-write of one user's counter; runs under that user's lock.
    async fn increment(
        &self,
        user_id: &str,
        elapsed_secs: u64,
    ) -> Result<UsageStatus, DomainError> {
        let today = self.today();
        let previous = match self.repo.load(user_id).await {
            Ok(Some(record)) if record.date == today => record.time_spent_seconds,
            Ok(Some(record)) => {
                debug!(stale_day = %record.date, %today, "Usage day rolled over, resetting");
                0
            }
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "Usage read failed, increment dropped");
                return Ok(UsageStatus::Unknown);
            }
        };

        let record = UsageRecord {
            date: today,
            time_spent_seconds: previous.saturating_add(elapsed_secs),
        };
        if let Err(e) = self.repo.store(user_id, &record).await {
            warn!(error = %e, "Usage write failed, reporting unknown");
            return Ok(UsageStatus::Unknown);
        }

        let limit = self.config.daily_limit_secs;
        if previous < limit && record.time_spent_seconds >= limit {
            info!(day = %today, "Daily usage limit reached");
            self.events.publish(&CompanionEvent::UsageLimitReached {
                user_id: user_id.to_string(),
                day: today,
                at: self.clock.now(),
            });
        }

        Ok(UsageStatus::Known(
            self.snapshot(today, record.time_spent_seconds),
        ))
    }

    fn snapshot(&self, day: DayKey, spent: u64) -> UsageSnapshot {
        UsageSnapshot {
            day,
            time_spent_seconds: spent,
            daily_limit_seconds: self.config.daily_limit_secs,
        }
    }

    fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // Drop the user's lock once nobody else holds or waits on it, so the map
    // only tracks users with increments in flight.
    fn release_lock(&self, user_id: &str) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
