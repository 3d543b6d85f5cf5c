//! The HTTP stack in front of the module routes.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::get,
    Json, Router,
};
use runtime::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create trace layer with proper typing
#[allow(clippy::type_complexity)]
pub fn create_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> tracing::Span + Clone,
> {
    TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let rid = req
            .headers()
            .get(request_id_header())
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            version = ?req.version(),
            request_id = %rid,
            status = Empty,
            latency_ms = Empty
        )
    })
}

/// Wrap module routes with the health endpoint and the shared middleware.
/// Layers run top to bottom for requests.
pub fn build_router(routes: Router, server: &ServerConfig) -> Router {
    let x_request_id = request_id_header();

    let timeout = (server.timeout_sec > 0)
        .then(|| TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    let cors = server.cors_permissive.then(CorsLayer::permissive);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(create_trace_layer())
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .option_layer(cors)
        .option_layer(timeout);

    routes
        .route("/health", get(health_check))
        .layer(middleware)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_carries_request_id() {
        let app = build_router(Router::new(), &ServerConfig::default());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let rid = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert_eq!(rid.len(), 36);
    }

    #[tokio::test]
    async fn client_request_id_is_kept() {
        let app = build_router(Router::new(), &ServerConfig::default());
        let resp = app
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let server = ServerConfig {
            body_limit_bytes: 16,
            ..ServerConfig::default()
        };
        let app = build_router(
            Router::new().route("/echo", axum::routing::post(|body: String| async move { body })),
            &server,
        );
        let resp = app
            .oneshot(
                Request::post("/echo")
                    .header("content-length", "64")
                    .body(Body::from(vec![b'a'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
