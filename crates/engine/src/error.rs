//! Engine error types

use thiserror::Error;

use bizlink_store::StoreError;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while computing suggestions
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requesting user does not exist or is deactivated
    #[error("user not found")]
    UserNotFound,

    /// Underlying store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
