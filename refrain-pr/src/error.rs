//! Error types for refrain-pr
//!
//! Every failure is rendered as a JSON error body; nothing here is fatal
//! to the process and no handler advances a session past a failed call.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SessionError;
use crate::services::PipelineError;
use refrain_common::FetchError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404) - e.g., unknown session id
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400) - e.g., malformed playlist link
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - operation invalid for the session's current stage
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stale selection (409) - suggestions were regenerated since
    #[error("Stale suggestions: {0}")]
    StaleSuggestions(String),

    /// Upstream endpoint failure (502)
    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<refrain_common::Error> for ApiError {
    fn from(err: refrain_common::Error) -> Self {
        match err {
            refrain_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            refrain_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::StaleSuggestions => ApiError::StaleSuggestions(err.to_string()),
            SessionError::InvalidOption(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Conflict(other.to_string()),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Fetch(fetch) => ApiError::Upstream(fetch),
            PipelineError::Session(session) => session.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "WRONG_STAGE", msg),
            ApiError::StaleSuggestions(msg) => {
                (StatusCode::CONFLICT, "STALE_SUGGESTIONS", msg)
            }
            ApiError::Upstream(FetchError::Transport { status, message }) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                match status {
                    Some(code) => format!(
                        "The service is unavailable right now (HTTP {}): {}",
                        code, message
                    ),
                    None => format!("Could not reach the service: {}", message),
                },
            ),
            ApiError::Upstream(FetchError::Malformed(msg)) => (
                StatusCode::BAD_GATEWAY,
                "MALFORMED_RESPONSE",
                format!("{}. Please try again.", msg),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_selection_maps_to_conflict() {
        let err: ApiError = SessionError::StaleSuggestions.into();
        assert!(matches!(err, ApiError::StaleSuggestions(_)));
    }

    #[test]
    fn invalid_option_maps_to_bad_request() {
        let err: ApiError = SessionError::InvalidOption(7).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn transport_failure_maps_to_upstream() {
        let err: ApiError = PipelineError::Fetch(FetchError::status(503, "down")).into();
        assert!(matches!(
            err,
            ApiError::Upstream(FetchError::Transport {
                status: Some(503),
                ..
            })
        ));
    }

    #[test]
    fn validation_failure_maps_to_bad_request() {
        let err: ApiError =
            refrain_common::Error::InvalidInput("bad link".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
