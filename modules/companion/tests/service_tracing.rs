//! The service layer logs under its instrumented spans.

mod common;

use chrono::Duration;
use tracing_test::traced_test;

use common::Harness;
use companion::contract::flows::{FlowRequest, MoodPredictionInput};
use companion::contract::model::NewJournalEntry;
use companion::domain::service::ServiceConfig;
use companion::domain::usage::UsageConfig;

#[traced_test]
#[tokio::test]
async fn usage_limit_is_logged_inside_the_usage_span() {
    let h = Harness::with_config(ServiceConfig {
        usage: UsageConfig {
            daily_limit_secs: 10,
            ..UsageConfig::default()
        },
    });
    h.service.record_activity("u1", 10).await.unwrap();

    assert!(logs_contain("companion.usage.record_activity"));
    assert!(logs_contain("Daily usage limit reached"));
}

#[traced_test]
#[tokio::test]
async fn day_rollover_is_logged() {
    let h = Harness::new();
    h.service.record_activity("u1", 10).await.unwrap();
    h.clock.advance(Duration::days(1));
    h.service.record_activity("u1", 10).await.unwrap();

    assert!(logs_contain("Usage day rolled over"));
}

#[traced_test]
#[tokio::test]
async fn failed_journal_query_is_warned() {
    let h = Harness::with_document_store(std::sync::Arc::new(common::BrokenStore));
    let recent = h.service.fetch_recent_entries("u1").await.unwrap();

    assert!(recent.entries.is_empty());
    assert!(logs_contain("companion.journal.fetch_recent_entries"));
    assert!(logs_contain("Journal query failed"));
}

#[traced_test]
#[tokio::test]
async fn recorded_entry_is_logged() {
    let h = Harness::new();
    h.service
        .record_entry(
            "u1",
            NewJournalEntry {
                mood: "calm".into(),
                content: "Read a book".into(),
            },
        )
        .await
        .unwrap();

    assert!(logs_contain("Recorded journal entry"));
}

#[traced_test]
#[tokio::test]
async fn rejected_model_output_is_logged_with_flow_name() {
    let h = Harness::new();
    h.model.answer("{\"mood\": 3}");
    let result = h
        .service
        .dispatch(FlowRequest::PredictMood(MoodPredictionInput {
            text: "hello".into(),
        }))
        .await;

    assert!(result.is_err());
    assert!(logs_contain("companion.flows.run"));
    assert!(logs_contain("flow=\"predict_mood\""));
    assert!(logs_contain("does not match the output schema"));
}
