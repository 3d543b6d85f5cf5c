mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{BrokenStore, CountingStore, Harness};
use companion::contract::model::NewJournalEntry;
use companion::domain::error::DomainError;
use companion::domain::events::CompanionEvent;
use companion::domain::ports::DocumentStore;
use companion::infra::storage::JOURNAL_COLLECTION;
use serde_json::json;

fn entry(mood: &str, content: &str) -> NewJournalEntry {
    NewJournalEntry {
        mood: mood.to_string(),
        content: content.to_string(),
    }
}

#[tokio::test]
async fn empty_history_is_empty() {
    let h = Harness::new();
    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    assert!(recent.entries.is_empty());
}

#[tokio::test]
async fn entries_come_back_newest_first() {
    let h = Harness::new();
    for i in 0..3 {
        h.service
            .record_entry("u1", entry("calm", &format!("entry {}", i)))
            .await
            .unwrap();
        h.clock.advance(Duration::minutes(5));
    }
    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    let contents: Vec<_> = recent.entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents, ["entry 2", "entry 1", "entry 0"]);
    assert_eq!(recent.entries[0].date, "2024-03-01 12:10:00");
}

#[tokio::test]
async fn only_the_last_twenty_are_returned() {
    let h = Harness::new();
    for i in 0..25 {
        h.service
            .record_entry("u1", entry("ok", &format!("entry {}", i)))
            .await
            .unwrap();
        h.clock.advance(Duration::seconds(1));
    }
    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    assert_eq!(recent.entries.len(), 20);
    assert_eq!(recent.entries.first().unwrap().content, "entry 24");
    assert_eq!(recent.entries.last().unwrap().content, "entry 5");
}

#[tokio::test]
async fn other_users_are_not_visible() {
    let h = Harness::new();
    h.service.record_entry("u1", entry("sad", "mine")).await.unwrap();
    h.service.record_entry("u2", entry("glad", "theirs")).await.unwrap();
    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    assert_eq!(recent.entries.len(), 1);
    assert_eq!(recent.entries[0].content, "mine");
}

#[tokio::test]
async fn legacy_documents_get_fallback_fields() {
    let h = Harness::new();
    let doc = json!({ "userId": "u1", "createdAt": "2024-02-01T08:00:00.000Z" });
    h.docs
        .insert(JOURNAL_COLLECTION, "legacy", doc.as_object().unwrap().clone())
        .await
        .unwrap();
    let doc = json!({ "userId": "u1", "mood": "", "content": "", "createdAt": "2024-02-02T08:00:00.000Z" });
    h.docs
        .insert(JOURNAL_COLLECTION, "blank", doc.as_object().unwrap().clone())
        .await
        .unwrap();

    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    assert_eq!(recent.entries.len(), 2);
    for e in &recent.entries {
        assert_eq!(e.mood, "Unknown");
        assert_eq!(e.content, "No content");
    }
    assert_eq!(recent.entries[0].date, "2024-02-02 08:00:00");
}

#[tokio::test]
async fn store_failure_reads_as_no_history() {
    let h = Harness::with_document_store(Arc::new(BrokenStore));
    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    assert!(recent.entries.is_empty());
}

#[tokio::test]
async fn store_failure_on_write_is_upstream() {
    let h = Harness::with_document_store(Arc::new(BrokenStore));
    let err = h
        .service
        .record_entry("u1", entry("calm", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Upstream { .. }));
    assert!(h.events.all().is_empty());
}

#[tokio::test]
async fn record_entry_validates_and_publishes() {
    let h = Harness::new();
    assert!(matches!(
        h.service.record_entry("u1", entry("calm", "   ")).await,
        Err(DomainError::InvalidArgument { .. })
    ));
    assert!(matches!(
        h.service.record_entry("", entry("calm", "hi")).await,
        Err(DomainError::InvalidArgument { .. })
    ));

    let saved = h
        .service
        .record_entry("u1", entry("  ", "felt fine"))
        .await
        .unwrap();
    assert_eq!(saved.mood, "Unknown");
    assert_eq!(saved.content, "felt fine");

    let events = h.events.all();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        CompanionEvent::JournalEntryRecorded { user_id, .. } if user_id == "u1"
    ));
    assert_eq!(h.docs.len(JOURNAL_COLLECTION), 1);
}

#[tokio::test]
async fn blank_user_is_rejected_before_the_store_is_queried() {
    let store = Arc::new(CountingStore::default());
    let h = Harness::with_document_store(store.clone());
    for user in ["", " ", "\t"] {
        match h.service.fetch_recent_entries(user).await {
            Err(DomainError::InvalidArgument { field, .. }) => assert_eq!(field, "user_id"),
            other => panic!("expected InvalidArgument for {:?}, got {:?}", user, other),
        }
    }
    assert_eq!(store.calls(), 0);

    h.service.fetch_recent_entries("u1").await.unwrap();
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn newest_entries_survive_the_cap_across_timestamp_formats() {
    let h = Harness::new();
    for i in 0..20 {
        let doc = json!({
            "userId": "u1",
            "content": format!("old {}", i),
            "createdAt": format!("2020-01-01T00:00:{:02}.000Z", i),
        });
        h.docs
            .insert(JOURNAL_COLLECTION, &format!("old-{}", i), doc.as_object().unwrap().clone())
            .await
            .unwrap();
    }
    // 2024-03-01T11:00:00Z as epoch millis.
    let doc = json!({ "userId": "u1", "content": "newest", "createdAt": 1_709_290_800_000_i64 });
    h.docs
        .insert(JOURNAL_COLLECTION, "newest", doc.as_object().unwrap().clone())
        .await
        .unwrap();
    // 09:00Z written with an offset; older than both entries recorded below.
    let doc = json!({ "userId": "u1", "content": "tokyo", "createdAt": "2024-03-01T18:00:00+09:00" });
    h.docs
        .insert(JOURNAL_COLLECTION, "tokyo", doc.as_object().unwrap().clone())
        .await
        .unwrap();
    h.service.record_entry("u1", entry("calm", "recorded")).await.unwrap();

    let recent = h.service.fetch_recent_entries("u1").await.unwrap();
    let contents: Vec<_> = recent.entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(recent.entries.len(), 20);
    assert_eq!(&contents[..3], ["recorded", "newest", "tokyo"]);
    assert_eq!(contents[3], "old 19");
    assert_eq!(contents[19], "old 3");
    assert_eq!(recent.entries[1].date, "2024-03-01 11:00:00");
}
