//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shopseg_runtime::RuntimeError;
use thiserror::Error;

/// Server error type
#[derive(Debug, Error)]
pub enum ServerError {
    /// Unusable request body
    #[error("{0}")]
    InvalidRequest(String),

    /// Segment evaluation failed; carries the underlying cause
    #[error("Error evaluating segment: {0}")]
    Evaluation(String),

    /// Upstream fetch failed during a manual sync
    #[error("Error syncing products: {0}")]
    Upstream(String),

    /// Request conflicts with work already in progress
    #[error("{0}")]
    Conflict(String),

    /// Feature not configured on this server
    #[error("{0}")]
    Unavailable(String),

    /// Internal failure reported with a fixed message only
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "message": message }))
            }
            ServerError::Evaluation(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error evaluating segment", "error": error }),
            ),
            ServerError::Upstream(error) => (
                StatusCode::BAD_GATEWAY,
                json!({ "message": "Error syncing products", "error": error }),
            ),
            ServerError::Conflict(message) => (StatusCode::CONFLICT, json!({ "message": message })),
            ServerError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "message": message }),
            ),
            ServerError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RuntimeError> for ServerError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::InvalidRequest(message) => ServerError::InvalidRequest(message),
            RuntimeError::SyncInProgress => ServerError::Conflict(err.to_string()),
            RuntimeError::UpstreamFetch(message) => ServerError::Upstream(message),
            RuntimeError::SyncAborted(_) => ServerError::Internal(err.to_string()),
            other => ServerError::Evaluation(other.to_string()),
        }
    }
}
