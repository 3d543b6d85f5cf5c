//! Request body extraction that fails with RFC 9457 problems.
//!
//! `axum::Json` rejects unreadable bodies with a plain-text response. Every
//! other error of this API is `application/problem+json`, so handlers take
//! [`ProblemJson`] instead.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, OriginalUri, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::rest::error::from_parts;
use crate::api::rest::problem::ProblemResponse;

/// JSON body extractor whose rejection is a [`ProblemResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemJson<T>(pub T);

impl<T, S> FromRequest<S> for ProblemJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request(
        req: Request,
        state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // Nested routers see a stripped URI; report the path the client sent.
            let instance = req
                .extensions()
                .get::<OriginalUri>()
                .map_or_else(|| req.uri().path(), |o| o.path())
                .to_owned();
            match Json::<T>::from_request(req, state).await {
                Ok(Json(value)) => Ok(ProblemJson(value)),
                Err(rejection) => Err(rejection_to_problem(&rejection, &instance)),
            }
        }
    }
}

// Keeps the rejection's status: 415 for a missing content type, 400 for
// broken syntax, 422 for a body that does not fit the target type.
fn rejection_to_problem(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    tracing::debug!(error = %rejection, "Rejected request body");
    ProblemResponse(from_parts(
        rejection.status(),
        "COMPANION_VALIDATION",
        "Invalid request body",
        rejection.body_text(),
        instance,
    ))
}
