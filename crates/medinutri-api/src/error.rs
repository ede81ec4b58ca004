//! API error types and JSON error response formatting.
//!
//! Every failing endpoint answers with the same `{error, message}` body and a
//! status code chosen by the [`ApiError`] variant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medinutri_core::MediNutriError;
use medinutri_engine::EngineError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    #[error("{0}")]
    BadRequest(String),
    /// 404 Not Found - no record with that name.
    #[error("{0}")]
    NotFound(String),
    /// 413 Payload Too Large - chat message over the configured length.
    #[error("{0}")]
    PayloadTooLarge(String),
    /// 500 Internal Server Error - unexpected server error.
    #[error("{0}")]
    Internal(String),
    /// 503 Service Unavailable - chat turned off in config.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.parts();
        let body = ErrorBody {
            error: error_code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Disabled => ApiError::ServiceUnavailable(err.to_string()),
            EngineError::MessageTooLong(_) => ApiError::PayloadTooLarge(err.to_string()),
            EngineError::EmptyHistory => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<MediNutriError> for ApiError {
    fn from(err: MediNutriError) -> Self {
        match &err {
            MediNutriError::Config(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
