//! Error types for the cache worker
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Worker Error Enum ==
/// Unified error type for the cache worker.
#[derive(Error, Debug, Clone)]
pub enum WorkerError {
    /// A manifest resource could not be fetched during install
    #[error("Manifest fetch failed for {url}: {reason}")]
    ManifestFetch { url: String, reason: String },

    /// The network request itself failed (offline, DNS, refused, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// A stale cache store could not be deleted during activation
    #[error("Failed to delete cache store '{0}'")]
    StoreDeletion(String),

    /// Only GET requests can be stored
    #[error("Request method '{0}' is unsupported for cache storage")]
    UnsupportedMethod(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let status = match &self {
            WorkerError::ManifestFetch { .. } | WorkerError::Network(_) => StatusCode::BAD_GATEWAY,
            WorkerError::InvalidRequest(_) | WorkerError::UnsupportedMethod(_) => {
                StatusCode::BAD_REQUEST
            }
            WorkerError::StoreDeletion(_) | WorkerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache worker.
pub type Result<T> = std::result::Result<T, WorkerError>;
