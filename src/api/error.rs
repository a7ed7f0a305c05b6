// src/api/error.rs
// Centralized error handling for HTTP API responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create a new bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNAUTHORIZED,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16(),
        });

        (self.status_code, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Extension trait for converting store-layer errors to ApiError
pub trait IntoApiError<T> {
    fn into_api_error(self, message: &str) -> Result<T, ApiError>;
}

impl<T, E> IntoApiError<T> for Result<T, E>
where
    E: std::fmt::Debug,
{
    fn into_api_error(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|e| {
            error!("{}: {:?}", message, e);
            ApiError::internal(message)
        })
    }
}

/// Extension trait for Option<T> to create ApiError for None cases
pub trait IntoApiErrorOption<T> {
    fn ok_or_not_found(self, message: &str) -> Result<T, ApiError>;
    fn ok_or_bad_request(self, message: &str) -> Result<T, ApiError>;
}

impl<T> IntoApiErrorOption<T> for Option<T> {
    fn ok_or_not_found(self, message: &str) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found(message))
    }

    fn ok_or_bad_request(self, message: &str) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::bad_request(message))
    }
}

/// Helper function for validation errors with field-level messages
pub fn validation_error(field: &str, reason: &str) -> ApiError {
    ApiError::bad_request(format!("Validation failed for {field}: {reason}"))
}

/// Helper function for missing parameter errors
pub fn missing_param_error(param_name: &str) -> ApiError {
    ApiError::bad_request(format!("Missing required parameter: {param_name}"))
}
