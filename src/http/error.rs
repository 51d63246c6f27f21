//! Mapping from the engine's error taxonomy to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use kw_app::AccessFlowError;

pub struct ApiError(pub AccessFlowError);

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts_left: Option<i32>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, attempts_left) = match &self.0 {
            AccessFlowError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            AccessFlowError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden", None),
            AccessFlowError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            AccessFlowError::Gone(_) => (StatusCode::GONE, "gone", None),
            AccessFlowError::InvalidCode { attempts_left } => {
                (StatusCode::BAD_REQUEST, "invalid_code", *attempts_left)
            }
            AccessFlowError::TooManyAttempts => {
                (StatusCode::TOO_MANY_REQUESTS, "too_many_attempts", None)
            }
            AccessFlowError::InvalidTransition(_) => {
                (StatusCode::BAD_REQUEST, "invalid_transition", None)
            }
            AccessFlowError::Validation(_) => (StatusCode::BAD_REQUEST, "validation", None),
            AccessFlowError::Upstream(msg) => {
                // Detail stays in the log; the caller gets a neutral 500.
                error!("upstream failure on state-transition path: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };
        let message = match &self.0 {
            AccessFlowError::Upstream(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (
            status,
            Json(ErrorBody {
                error: kind,
                message,
                attempts_left,
            }),
        )
            .into_response()
    }
}

impl From<AccessFlowError> for ApiError {
    fn from(e: AccessFlowError) -> Self {
        Self(e)
    }
}
