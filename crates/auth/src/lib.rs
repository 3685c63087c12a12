//! Bizlink - Authentication
//!
//! JWT-based authentication and password hashing for the Bizlink API.
//!
//! # Overview
//!
//! Two token kinds are issued, both HS256 JWTs signed with the server secret:
//!
//! | Kind | TTL | Carried claims |
//! |------|-----|----------------|
//! | Access | 24h (configurable) | user id, email, role, profile flags |
//! | Password reset | 1h | user id, `purpose = "password_reset"` |
//!
//! Access tokens are validated by an [`AuthProvider`]; the HTTP layer loads
//! the full user record afterwards so deactivated accounts are rejected even
//! while their tokens are still live.
//!
//! Passwords are hashed with Argon2id in PHC string format, see [`password`].

mod claims;
mod error;
pub mod password;
mod provider;

/// Test utilities for generating signed JWTs
pub mod test_utils;

pub use claims::{
    AccessClaims, RESET_PURPOSE, issue_access_token, issue_reset_token, verify_reset_token,
};
pub use error::{AuthError, Result};
pub use provider::{AuthProvider, LocalJwtProvider};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;
