pub mod documents;
pub mod generative;
pub mod objects;
pub mod voice;

use chrono::{DateTime, Utc};

pub use documents::{Direction, Document, DocumentSnapshot, DocumentStore, Query};
pub use generative::{GenerativeModel, MediaPart, RenderedPrompt};
pub use objects::ObjectStorage;
pub use voice::{AudioSample, VoiceCloner};

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}

/// Source of "now". Day keys and journal timestamps are taken from here so the
/// server stays authoritative about time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
