//! JWT token claims
//!
//! Defines the claim sets for access tokens and password-reset tokens, plus
//! the encode helpers used by the login/register/reset handlers.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Purpose marker carried by password-reset tokens
pub const RESET_PURPOSE: &str = "password_reset";

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    #[serde(rename = "uid")]
    pub user_id: String,

    /// User email
    #[serde(rename = "email", default)]
    pub email: String,

    /// Business role at issue time (pending, investor, seller, ...)
    #[serde(rename = "role", default)]
    pub role: String,

    /// Whether the profile was completed at issue time
    #[serde(rename = "pc", default)]
    pub profile_completed: bool,

    /// Whether the account was verified at issue time
    #[serde(rename = "vf", default)]
    pub verified: bool,

    // Standard JWT claims
    /// Subject (user ID)
    #[serde(rename = "sub", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,
}

impl AccessClaims {
    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now().timestamp()
    }
}

/// Claims carried by a password-reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResetClaims {
    #[serde(rename = "uid")]
    user_id: String,

    /// Must equal [`RESET_PURPOSE`]
    #[serde(rename = "purpose", default)]
    purpose: String,

    #[serde(rename = "exp")]
    expires_at: i64,

    #[serde(rename = "iat")]
    issued_at: i64,
}

/// Issue a signed access token for a user
pub fn issue_access_token(
    secret: &[u8],
    user_id: &str,
    email: &str,
    role: &str,
    profile_completed: bool,
    verified: bool,
    expires_in: Duration,
) -> Result<String> {
    let now = Utc::now();

    let claims = AccessClaims {
        user_id: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        profile_completed,
        verified,
        subject: Some(user_id.to_string()),
        expires_at: (now + expires_in).timestamp(),
        issued_at: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::InvalidClaims(format!("failed to encode token: {}", e)))
}

/// Issue a short-lived password-reset token for a user
pub fn issue_reset_token(secret: &[u8], user_id: &str, expires_in: Duration) -> Result<String> {
    let now = Utc::now();

    let claims = ResetClaims {
        user_id: user_id.to_string(),
        purpose: RESET_PURPOSE.to_string(),
        expires_at: (now + expires_in).timestamp(),
        issued_at: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::InvalidClaims(format!("failed to encode token: {}", e)))
}

/// Verify a password-reset token and return the user ID it was issued for
///
/// Rejects tokens whose `purpose` claim is not [`RESET_PURPOSE`], so an
/// access token can never be replayed as a reset token.
pub fn verify_reset_token(secret: &[u8], token: &str) -> Result<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();

    let data = decode::<ResetClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::InvalidClaims(e.to_string()),
        })?;

    if data.claims.purpose != RESET_PURPOSE {
        return Err(AuthError::WrongPurpose);
    }

    Ok(data.claims.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TEST_SECRET;

    #[test]
    fn test_access_token_roundtrip() {
        let token = issue_access_token(
            TEST_SECRET,
            "user-1",
            "test@example.com",
            "seller",
            true,
            false,
            Duration::hours(1),
        )
        .unwrap();

        // Three dot-separated segments
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_reset_token_roundtrip() {
        let token = issue_reset_token(TEST_SECRET, "user-1", Duration::hours(1)).unwrap();
        let user_id = verify_reset_token(TEST_SECRET, &token).unwrap();
        assert_eq!(user_id, "user-1");
    }

    #[test]
    fn test_expired_reset_token() {
        let token = issue_reset_token(TEST_SECRET, "user-1", Duration::hours(-1)).unwrap();
        let result = verify_reset_token(TEST_SECRET, &token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_access_token_rejected_as_reset_token() {
        let token = issue_access_token(
            TEST_SECRET,
            "user-1",
            "test@example.com",
            "seller",
            true,
            false,
            Duration::hours(1),
        )
        .unwrap();

        let result = verify_reset_token(TEST_SECRET, &token);
        assert!(matches!(result, Err(AuthError::WrongPurpose)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_reset_token(TEST_SECRET, "user-1", Duration::hours(1)).unwrap();
        let result = verify_reset_token(b"another-secret-key-32-bytes!!!!!", &token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_claims_expiry_check() {
        let claims = AccessClaims {
            user_id: "uid".to_string(),
            email: "test@example.com".to_string(),
            role: "seller".to_string(),
            profile_completed: false,
            verified: false,
            subject: None,
            expires_at: 0,
            issued_at: 0,
        };
        assert!(claims.is_expired());
    }
}
