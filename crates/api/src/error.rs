//! API error types
//!
//! Provides structured error responses for the HTTP API. Every failure maps
//! to one of these variants before leaving a handler; internal detail is
//! logged, not leaked.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use bizlink_auth::AuthError;
use bizlink_engine::EngineError;
use bizlink_store::StoreError;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication required or credential invalid
    #[error("authentication required")]
    Unauthorized,

    /// Authentication token has expired
    #[error("authentication token has expired")]
    TokenExpired,

    /// Authenticated but not allowed
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Operation conflicts with current state
    #[error("conflict: {0}")]
    Conflict(String),

    /// Validation error
    #[error("validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    // Helper constructors

    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a validation error
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(msg) => Self::Internal(msg),
            StoreError::NotFound { entity } => Self::NotFound(entity.to_string()),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Forbidden(msg) => Self::Forbidden(msg),
            StoreError::Invalid { field, message } => Self::Validation { field, message },
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::UserNotFound => Self::NotFound("user".to_string()),
            EngineError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenExpired => Self::TokenExpired,
            AuthError::PasswordError(msg) => Self::Internal(msg),
            _ => Self::Unauthorized,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code (machine-readable)
    pub error: &'static str,
    /// Error message (human-readable)
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Never leak internal detail to the caller
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: self.code(),
            message,
        };

        tracing::warn!(
            error_code = body.error,
            error_message = %body.message,
            status = %status,
            "API error"
        );

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::conflict("dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::not_found("user").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("role", "unknown").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let e: ApiError = StoreError::not_found("connection request").into();
        assert!(matches!(e, ApiError::NotFound(_)));

        let e: ApiError = StoreError::conflict("duplicate").into();
        assert!(matches!(e, ApiError::Conflict(_)));

        let e: ApiError = StoreError::forbidden("not the sender").into();
        assert!(matches!(e, ApiError::Forbidden(_)));

        let e: ApiError = StoreError::Database("disk full".to_string()).into();
        assert!(matches!(e, ApiError::Internal(_)));
    }

    #[test]
    fn test_auth_error_mapping() {
        let e: ApiError = AuthError::TokenExpired.into();
        assert!(matches!(e, ApiError::TokenExpired));

        let e: ApiError = AuthError::InvalidSignature.into();
        assert!(matches!(e, ApiError::Unauthorized));
    }

    #[test]
    fn test_engine_error_mapping() {
        let e: ApiError = EngineError::UserNotFound.into();
        assert!(matches!(e, ApiError::NotFound(_)));
    }
}
