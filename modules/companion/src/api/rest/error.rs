use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse, ValidationError};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> Problem {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.companion.dev/{}", code))
        .with_code(code)
        .with_instance(instance);

    if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    }
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let problem = match e {
        DomainError::InvalidArgument { field, message } => from_parts(
            StatusCode::BAD_REQUEST,
            "COMPANION_VALIDATION",
            "Validation error",
            format!("{}: {}", field, message),
            instance,
        )
        .with_errors(vec![ValidationError {
            detail: message.clone(),
            pointer: format!("/{}", field),
        }]),
        DomainError::NotFound { what, id } => from_parts(
            StatusCode::NOT_FOUND,
            "COMPANION_NOT_FOUND",
            "Not found",
            format!("{} for '{}' was not found", what, id),
            instance,
        ),
        DomainError::Upstream { service, .. } => {
            // Upstream messages can carry provider payloads; keep them in logs only.
            tracing::error!(error = %e, "Upstream failure");
            from_parts(
                StatusCode::BAD_GATEWAY,
                "COMPANION_UPSTREAM",
                "Upstream service failed",
                format!("The {} service is unavailable or returned an invalid answer", service),
                instance,
            )
        }
    };
    ProblemResponse(problem)
}
