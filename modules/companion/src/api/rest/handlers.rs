use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path},
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    CloneVoiceReq, CreateEntryReq, JournalEntryDto, MoodAnalysisDto, RecentEntriesDto,
    RecordActivityReq, TranscriptionReq, UsageDto, VoiceProfileDto,
};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::extract::ProblemJson;
use crate::api::rest::problem::ProblemResponse;
use crate::contract::flows::{FlowRequest, FlowResponse};
use crate::domain::service::Service;

/// Current daily usage of a user
pub async fn get_usage(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<UsageDto>, ProblemResponse> {
    match svc.usage_status(&user_id).await {
        Ok(status) => Ok(Json(status.into())),
        Err(e) => {
            error!("Failed to read usage for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Add a foreground tick to today's counter
pub async fn record_tick(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    ProblemJson(req_body): ProblemJson<RecordActivityReq>,
) -> Result<Json<UsageDto>, ProblemResponse> {
    match svc.record_activity(&user_id, req_body.elapsed_secs).await {
        Ok(status) => Ok(Json(status.into())),
        Err(e) => {
            error!("Failed to record activity for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn recent_entries(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<RecentEntriesDto>, ProblemResponse> {
    match svc.fetch_recent_entries(&user_id).await {
        Ok(recent) => Ok(Json(recent.into())),
        Err(e) => {
            error!("Failed to fetch journal for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn create_entry(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    ProblemJson(req_body): ProblemJson<CreateEntryReq>,
) -> Result<(StatusCode, Json<JournalEntryDto>), ProblemResponse> {
    info!("Recording journal entry for {}", user_id);

    match svc.record_entry(&user_id, req_body.into()).await {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry.into()))),
        Err(e) => {
            error!("Failed to record journal entry for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Mood analysis over the recent journal; `analysis` is null without history
pub async fn analyze_mood(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<MoodAnalysisDto>, ProblemResponse> {
    match svc.analyze_recent_mood(&user_id).await {
        Ok(analysis) => Ok(Json(MoodAnalysisDto { analysis })),
        Err(e) => {
            error!("Mood analysis failed for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn transcribe_entry(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    ProblemJson(req_body): ProblemJson<TranscriptionReq>,
) -> Result<(StatusCode, Json<JournalEntryDto>), ProblemResponse> {
    info!("Transcribing journal entry for {}", user_id);

    match svc
        .transcribe_and_record(&user_id, &req_body.audio_data_uri)
        .await
    {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry.into()))),
        Err(e) => {
            error!("Transcription failed for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Run any model-backed flow by name
pub async fn dispatch_flow(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    ProblemJson(request): ProblemJson<FlowRequest>,
) -> Result<Json<FlowResponse>, ProblemResponse> {
    let flow = request.name();
    info!("Dispatching flow {}", flow);

    match svc.dispatch(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Flow {} failed: {}", flow, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn clone_voice(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    ProblemJson(req_body): ProblemJson<CloneVoiceReq>,
) -> Result<(StatusCode, Json<VoiceProfileDto>), ProblemResponse> {
    info!("Cloning voice for {}", user_id);

    match svc.clone_voice(&user_id, req_body.into()).await {
        Ok(profile) => Ok((StatusCode::CREATED, Json(profile.into()))),
        Err(e) => {
            error!("Voice cloning failed for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_voice(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<VoiceProfileDto>, ProblemResponse> {
    match svc.voice_profile(&user_id).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e) => {
            error!("Failed to load voice profile for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
