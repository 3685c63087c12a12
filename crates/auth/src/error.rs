//! Authentication error types

use thiserror::Error;

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during authentication operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is missing or empty
    #[error("missing token")]
    MissingToken,

    /// JWT signature verification failed
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Token claims are invalid
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// Token was issued for a different purpose (e.g. a reset token used as
    /// an access token)
    #[error("wrong token purpose")]
    WrongPurpose,

    /// Password hashing or verification failed
    #[error("password error: {0}")]
    PasswordError(String),
}
