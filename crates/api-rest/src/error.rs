//! HTTP error handling and conversion.
//!
//! Application errors map onto HTTP statuses with a JSON [`ErrorResponse`]
//! body. The legacy endpoint answers with plain text instead, see
//! [`ApiError::into_plain_response`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rankings_application::ApplicationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// API-specific error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Application layer error
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Bad request
    #[error("{0}")]
    BadRequest(String),

    /// Not found
    #[error("Resource not found")]
    NotFound,

    /// Internal server error
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Application(err) => StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API response
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Application(err) => err.error_code(),
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to clients; application errors expose only their detail
    pub fn client_message(&self) -> String {
        match self {
            Self::Application(
                ApplicationError::NotFound(msg)
                | ApplicationError::InvalidInput(msg)
                | ApplicationError::StoreUnavailable(msg)
                | ApplicationError::Internal(msg),
            ) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Plain-text response used by the legacy endpoint
    pub fn into_plain_response(self) -> Response {
        let status = self.status_code();
        self.log(status);
        (status, self.client_message()).into_response()
    }

    fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            error!(error_code = self.error_code(), error = %self, "Request error");
        }
    }
}

/// Standardized error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// Add request ID to the error response
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.log(status);

        let body = ErrorResponse::new(self.error_code(), self.client_message());

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_errors_keep_their_status() {
        let err = ApiError::from(ApplicationError::InvalidInput("unknown game: x".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.client_message(), "unknown game: x");

        let err = ApiError::from(ApplicationError::StoreUnavailable("timeout".into()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_bad_request_message_is_verbatim() {
        let err = ApiError::BadRequest("game not specified".into());
        assert_eq!(err.client_message(), "game not specified");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
