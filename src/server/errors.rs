//! Service error envelope

use crate::domain::ScrubError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `x-api-key` header on the request
    #[error("Missing API key")]
    MissingApiKey,

    /// `x-api-key` does not match the configured key
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Request body could not be read
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failure of the detection and redaction core
    #[error(transparent)]
    Scrub(#[from] ScrubError),

    /// Blocking task panicked or was cancelled
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Scrub(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error classification reported as `kind`
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingApiKey | ApiError::InvalidApiKey => "auth_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Scrub(e) => e.kind(),
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(kind, detail = %detail, "Request failed");
        } else {
            tracing::warn!(kind, status = status.as_u16(), "Request rejected");
        }

        let body = json!({ "status": "error", "kind": kind, "detail": detail });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
