//! Storage error types

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(String),

    /// Referenced entity does not exist
    #[error("{entity} not found")]
    NotFound {
        /// Entity kind (user, connection request, notification)
        entity: &'static str,
    },

    /// Operation conflicts with current state (duplicate, double-response)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Acting user is not allowed to perform the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Invalid input
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Offending field name
        field: String,
        /// What is wrong with it
        message: String,
    },
}

impl StoreError {
    /// Create a NotFound error
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Create an Invalid error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<bizlink_auth::AuthError> for StoreError {
    fn from(e: bizlink_auth::AuthError) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::not_found("user").to_string(), "user not found");
        assert!(
            StoreError::conflict("request already responded to")
                .to_string()
                .contains("conflict")
        );
        assert!(
            StoreError::invalid("to_user", "required")
                .to_string()
                .contains("to_user")
        );
    }
}
