use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount point of the companion API.
pub const BASE_PATH: &str = "/companion/v1";

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let api = Router::new()
        // Usage gate
        .route("/users/{user_id}/usage", get(handlers::get_usage))
        .route("/users/{user_id}/usage/ticks", post(handlers::record_tick))
        // Journal
        .route("/users/{user_id}/journal", post(handlers::create_entry))
        .route(
            "/users/{user_id}/journal/recent",
            get(handlers::recent_entries),
        )
        .route(
            "/users/{user_id}/journal/mood-analysis",
            post(handlers::analyze_mood),
        )
        .route(
            "/users/{user_id}/journal/transcriptions",
            post(handlers::transcribe_entry),
        )
        // Flows
        .route("/flows", post(handlers::dispatch_flow))
        // Voice
        .route(
            "/users/{user_id}/voice",
            get(handlers::get_voice).post(handlers::clone_voice),
        )
        .layer(Extension(service));

    Ok(router.nest(BASE_PATH, api))
}
