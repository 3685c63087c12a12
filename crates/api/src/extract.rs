//! Authentication extractors
//!
//! Three tiers, each building on the previous:
//!
//! - [`AuthUser`] - a valid access token; claims only, no directory lookup
//! - [`ActiveUser`] - claims plus the stored user; rejects deactivated
//!   accounts even while their tokens are still live
//! - [`CompletedUser`] - an active user whose profile is completed
//!
//! Tokens are read from the `Authorization: Bearer` header first, then the
//! `access_token` cookie.

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use bizlink_auth::AccessClaims;
use bizlink_store::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Maximum token size (8KB) - oversized tokens are treated as missing
const MAX_TOKEN_SIZE: usize = 8 * 1024;

/// Cookie that carries the access token
pub const AUTH_COOKIE: &str = "access_token";

/// Extract a token from the request
///
/// Checks in order:
/// 1. Authorization header (Bearer or raw)
/// 2. Cookie (`access_token`)
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(token) = extract_from_auth_header(parts) {
        return (token.len() <= MAX_TOKEN_SIZE).then_some(token);
    }

    if let Some(token) = extract_from_cookie(parts) {
        return (token.len() <= MAX_TOKEN_SIZE).then_some(token);
    }

    None
}

fn extract_from_auth_header(parts: &Parts) -> Option<String> {
    let auth_header = parts.headers.get(AUTHORIZATION)?;

    if auth_header.len() > MAX_TOKEN_SIZE + 7 {
        // "Bearer " = 7 chars
        return None;
    }

    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_from_cookie(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get("cookie")?.to_str().ok()?;

    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(AUTH_COOKIE) {
            let value = value.strip_prefix('=')?.trim();

            // Handle quoted values: access_token="value"
            let value = if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
                &value[1..value.len() - 1]
            } else {
                value
            };

            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Authenticated request claims
///
/// # Example
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl std::ops::Deref for AuthUser {
    type Target = AccessClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(ApiError::Unauthorized)?;
        let claims = state.auth.validate(&token).await?;
        Ok(AuthUser(claims))
    }
}

/// Authenticated, existing, active user
///
/// Loads the user record so that deleted or deactivated accounts are
/// rejected regardless of token validity.
#[derive(Debug, Clone)]
pub struct ActiveUser(pub User);

impl std::ops::Deref for ActiveUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        let user = state
            .db
            .users()
            .get_by_id(&claims.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("user"))?;

        if !user.is_active {
            return Err(ApiError::forbidden("account is deactivated"));
        }

        Ok(ActiveUser(user))
    }
}

/// Active user with a completed profile
///
/// Suggestion endpoints require the full multi-step profile.
#[derive(Debug, Clone)]
pub struct CompletedUser(pub User);

impl std::ops::Deref for CompletedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CompletedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ActiveUser(user) = ActiveUser::from_request_parts(parts, state).await?;

        if !user.profile_completed {
            return Err(ApiError::forbidden("profile completion required"));
        }

        Ok(CompletedUser(user))
    }
}
