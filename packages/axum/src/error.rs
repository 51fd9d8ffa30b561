//! Application-level error type returned by handlers.
//!
//! All variants serialise to the [`ErrorResponse`] JSON body and map to the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use halkit::TypeError;
use serde::{Deserialize, Serialize};

/// The JSON body returned for all error responses.
///
/// ```json
/// { "error": "missing Host header", "code": "invalid_request" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable description of the problem.
    pub error: String,

    /// Machine-readable error code: `invalid_request`, `not_found` or
    /// `internal_error`.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };
        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

/// A document that fails construction inside a handler is a server bug, not
/// a client error.
impl From<TypeError> for AppError {
    fn from(e: TypeError) -> Self {
        tracing::error!(error = %e, "failed to build HAL document");
        AppError::Internal(e.to_string())
    }
}
