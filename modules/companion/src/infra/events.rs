use tracing::info;

use crate::domain::events::CompanionEvent;
use crate::domain::ports::EventPublisher;

/// Publishes domain events as structured log records under the
/// `companion::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl EventPublisher<CompanionEvent> for TracingEventPublisher {
    fn publish(&self, event: &CompanionEvent) {
        match event {
            CompanionEvent::UsageLimitReached { user_id, day, at } => {
                info!(target: "companion::events", event = "usage_limit_reached", %user_id, %day, %at);
            }
            CompanionEvent::JournalEntryRecorded {
                user_id,
                entry_id,
                at,
            } => {
                info!(target: "companion::events", event = "journal_entry_recorded", %user_id, %entry_id, %at);
            }
            CompanionEvent::VoiceCloned {
                user_id,
                voice_id,
                at,
            } => {
                info!(target: "companion::events", event = "voice_cloned", %user_id, %voice_id, %at);
            }
        }
    }
}
