//! Authentication providers
//!
//! Defines the `AuthProvider` trait for validating access tokens and the
//! local HMAC implementation used by self-hosted deployments.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use crate::claims::AccessClaims;
use crate::error::{AuthError, Result};

/// Authentication provider trait
///
/// Implement this trait to add new authentication backends; the HTTP layer
/// only depends on this interface.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Validate an access token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the signature is invalid, the token has
    /// expired, or the claims fail to decode.
    async fn validate(&self, token: &str) -> Result<AccessClaims>;

    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Local JWT provider using HMAC-SHA256
///
/// Validates JWT tokens signed with a shared secret.
///
/// # Example
///
/// ```
/// use bizlink_auth::LocalJwtProvider;
///
/// let provider = LocalJwtProvider::new(b"your-secret-key-at-least-32-bytes!");
/// ```
pub struct LocalJwtProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for LocalJwtProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalJwtProvider")
            .field("algorithm", &"HS256")
            .finish()
    }
}

impl LocalJwtProvider {
    /// Create a new provider with an HMAC-SHA256 secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Secret key for HMAC-SHA256 (should be at least 32 bytes)
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Claims are checked ourselves; no required spec claims
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl AuthProvider for LocalJwtProvider {
    async fn validate(&self, token: &str) -> Result<AccessClaims> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("JWT validation failed: {:?}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::InvalidClaims(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_SECRET, create_test_token, create_test_token_with_options};
    use chrono::Duration;

    #[tokio::test]
    async fn test_valid_token() {
        let provider = LocalJwtProvider::new(TEST_SECRET);
        let token = create_test_token("user-1", "test@example.com", "seller");

        let claims = provider.validate(&token).await.unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, "seller");
    }

    #[tokio::test]
    async fn test_empty_token() {
        let provider = LocalJwtProvider::new(TEST_SECRET);

        let result = provider.validate("").await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let provider = LocalJwtProvider::new(TEST_SECRET);

        let result = provider.validate("not-a-jwt").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_signature() {
        let provider = LocalJwtProvider::new(TEST_SECRET);

        let token = create_test_token_with_options(
            "user-1",
            "test@example.com",
            "seller",
            true,
            b"different-secret-key-32-bytes!!!",
            Duration::hours(1),
        );

        let result = provider.validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let provider = LocalJwtProvider::new(TEST_SECRET);

        let token = create_test_token_with_options(
            "user-1",
            "test@example.com",
            "seller",
            true,
            TEST_SECRET,
            Duration::hours(-1),
        );

        let result = provider.validate(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }
}
