//! Test utilities for generating JWT tokens
//!
//! These helpers create valid signed JWTs for testing authentication flows.
//! Use these instead of mocking - they exercise the real validation path.

use chrono::Duration;

use crate::claims::issue_access_token;

/// Test secret for JWT signing (32 bytes for HS256)
pub const TEST_SECRET: &[u8] = b"test-secret-key-32-bytes-long!!!";

/// Create a test access token with a completed profile
///
/// # Example
///
/// ```
/// use bizlink_auth::test_utils::{create_test_token, TEST_SECRET};
/// use bizlink_auth::LocalJwtProvider;
///
/// let token = create_test_token("user-1", "test@example.com", "seller");
/// let provider = LocalJwtProvider::new(TEST_SECRET);
/// // Token is valid and can be verified
/// ```
pub fn create_test_token(user_id: &str, email: &str, role: &str) -> String {
    create_test_token_with_options(user_id, email, role, true, TEST_SECRET, Duration::hours(1))
}

/// Create a test token for a user whose profile is not yet complete
pub fn incomplete_profile_token(user_id: &str, email: &str) -> String {
    create_test_token_with_options(
        user_id,
        email,
        "pending",
        false,
        TEST_SECRET,
        Duration::hours(1),
    )
}

/// Create a test token with full control over all options
pub fn create_test_token_with_options(
    user_id: &str,
    email: &str,
    role: &str,
    profile_completed: bool,
    secret: &[u8],
    expires_in: Duration,
) -> String {
    issue_access_token(
        secret,
        user_id,
        email,
        role,
        profile_completed,
        true,
        expires_in,
    )
    .expect("failed to encode test JWT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{AuthProvider, LocalJwtProvider};

    #[tokio::test]
    async fn test_create_test_token() {
        let provider = LocalJwtProvider::new(TEST_SECRET);
        let token = create_test_token("user-1", "test@example.com", "investor");

        let claims = provider.validate(&token).await.unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, "investor");
        assert!(claims.profile_completed);
    }

    #[tokio::test]
    async fn test_incomplete_profile_token() {
        let provider = LocalJwtProvider::new(TEST_SECRET);
        let token = incomplete_profile_token("user-2", "new@example.com");

        let claims = provider.validate(&token).await.unwrap();
        assert_eq!(claims.role, "pending");
        assert!(!claims.profile_completed);
    }
}
