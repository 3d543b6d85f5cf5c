//! The model and voice adapters against a mock HTTP server, driven through
//! the in-process client.

use httpmock::prelude::*;
use serde_json::json;

use companion::config::CompanionConfig;
use companion::contract::client::CompanionApi;
use companion::contract::error::CompanionError;
use companion::contract::flows::{FlowRequest, FlowResponse, MoodPredictionInput};
use companion::contract::model::VoiceCloneRequest;
use companion::Companion;

const WAV_DATA_URI: &str = "data:audio/wav;base64,UklGRiQAAABXQVZF";

fn module_for(server: &MockServer) -> Companion {
    let mut cfg = CompanionConfig::default();
    cfg.generative.base_url = server.base_url();
    cfg.generative.model = "test-model".into();
    cfg.generative.api_key = "gen-key".into();
    cfg.voice.base_url = server.base_url();
    cfg.voice.api_key = "voice-key".into();
    cfg.http_timeout_secs = 5;

    let module = Companion::default();
    module.init(&cfg).unwrap();
    module
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn flow_calls_generate_content_with_api_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/test-model:generateContent")
                .header("x-goog-api-key", "gen-key")
                .header("content-type", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(candidate(
                    r#"{"mood":"calm","confidence":0.6,"reasoning":"steady tone"}"#,
                ));
        })
        .await;

    let client = module_for(&server).client().unwrap();
    let resp = client
        .dispatch(FlowRequest::PredictMood(MoodPredictionInput {
            text: "Quiet evening".into(),
        }))
        .await
        .unwrap();

    mock.assert_async().await;
    match resp {
        FlowResponse::PredictMood(p) => assert_eq!(p.mood, "calm"),
        other => panic!("unexpected response {:?}", other),
    }
}

#[tokio::test]
async fn model_error_status_is_upstream_without_detail() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/test-model:generateContent");
            then.status(503).body("overloaded");
        })
        .await;

    let client = module_for(&server).client().unwrap();
    let err = client
        .dispatch(FlowRequest::PredictMood(MoodPredictionInput {
            text: "hello".into(),
        }))
        .await
        .unwrap_err();
    assert_eq!(err, CompanionError::upstream("generative_model"));
}

#[tokio::test]
async fn empty_candidates_are_upstream_failure() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/test-model:generateContent");
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let client = module_for(&server).client().unwrap();
    let err = client
        .dispatch(FlowRequest::PredictMood(MoodPredictionInput {
            text: "hello".into(),
        }))
        .await
        .unwrap_err();
    assert!(matches!(err, CompanionError::Upstream { .. }));
}

#[tokio::test]
async fn voice_clone_posts_multipart_sample() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/voices/add")
                .header("xi-api-key", "voice-key")
                .header_exists("content-type");
            then.status(200)
                .json_body(json!({ "voice_id": "vx-1", "requires_verification": false }));
        })
        .await;

    let client = module_for(&server).client().unwrap();
    let profile = client
        .clone_voice(
            "u1",
            VoiceCloneRequest {
                name: "Me".into(),
                audio_data_uri: WAV_DATA_URI.into(),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(profile.voice_id.as_deref(), Some("vx-1"));
    assert_eq!(client.voice_profile("u1").await.unwrap(), profile);
}

#[tokio::test]
async fn rejected_clone_leaves_no_profile() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/voices/add");
            then.status(401).json_body(json!({ "detail": "invalid api key" }));
        })
        .await;

    let client = module_for(&server).client().unwrap();
    let err = client
        .clone_voice(
            "u1",
            VoiceCloneRequest {
                name: "Me".into(),
                audio_data_uri: WAV_DATA_URI.into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CompanionError::upstream("voice_cloning"));
    assert!(matches!(
        client.voice_profile("u1").await,
        Err(CompanionError::NotFound { .. })
    ));
}
