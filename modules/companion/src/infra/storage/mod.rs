//! Persistence adapters.
//!
//! `memory` implements the document and object ports in process; `repos`
//! maps the domain repositories onto any [`DocumentStore`].
//!
//! [`DocumentStore`]: crate::domain::ports::DocumentStore

pub mod memory;
pub mod objects;
pub mod repos;

pub use memory::InMemoryDocumentStore;
pub use objects::InMemoryObjectStorage;
pub use repos::{
    DocumentJournalRepository, DocumentProfileRepository, DocumentUsageRepository,
    JOURNAL_COLLECTION, USAGE_COLLECTION, USERS_COLLECTION,
};
