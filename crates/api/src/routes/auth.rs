//! Authentication routes
//!
//! Registration, login/logout, and the password-reset flow. Login and
//! registration issue an access token both in the response body and as an
//! HttpOnly cookie.

use axum::http::{StatusCode, header};
use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde::{Deserialize, Serialize};

use bizlink_auth::{MIN_PASSWORD_LENGTH, issue_access_token, issue_reset_token, verify_reset_token};
use bizlink_store::{NewUser, User};

use crate::error::{ApiError, Result};
use crate::extract::AUTH_COOKIE;
use crate::state::AppState;

/// Auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

/// User info in auth responses
#[derive(Debug, Serialize)]
pub struct AuthUserResponse {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_verified: bool,
    pub profile_completed: bool,
}

impl From<&User> for AuthUserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.as_str().to_string(),
            is_verified: user.is_verified,
            profile_completed: user.profile_completed,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Login/registration response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUserResponse,
}

type CookieResponse = (StatusCode, [(header::HeaderName, String); 1], Json<AuthResponse>);

fn issue_session(state: &AppState, user: &User, status: StatusCode) -> Result<CookieResponse> {
    let token = issue_access_token(
        &state.jwt_secret,
        &user.id,
        &user.email,
        user.role.as_str(),
        user.profile_completed,
        user.is_verified,
        state.token_ttl(),
    )?;

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        AUTH_COOKIE,
        token,
        state.jwt_expires_in.as_secs()
    );

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Register a new account
///
/// POST /api/v1/auth/register
///
/// The account starts with role `pending`; the business role is selected
/// later in onboarding.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<CookieResponse> {
    if req.email.is_empty()
        || req.password.is_empty()
        || req.first_name.is_empty()
        || req.last_name.is_empty()
        || req.phone.is_empty()
    {
        return Err(ApiError::bad_request(
            "email, password, first_name, last_name and phone are required",
        ));
    }

    if !req.email.contains('@') {
        return Err(ApiError::validation("email", "invalid email address"));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }

    let user = state
        .db
        .users()
        .create_user(&NewUser {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
        })
        .await?;

    issue_session(&state, &user, StatusCode::CREATED)
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Log in with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<CookieResponse> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let user = state
        .db
        .users()
        .verify_credentials(&req.email, &req.password)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_active {
        return Err(ApiError::Unauthorized);
    }

    issue_session(&state, &user, StatusCode::OK)
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// Log out, clearing the auth cookie
///
/// POST /api/v1/auth/logout
async fn logout() -> (StatusCode, [(header::HeaderName, String); 1], Json<LogoutResponse>) {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        AUTH_COOKIE
    );

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            message: "Logout successful",
        }),
    )
}

/// Forgot-password request
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Forgot-password response
///
/// There is no mail delivery; the token is returned directly and the client
/// is responsible for getting it to the user.
#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub reset_token: String,
}

/// Issue a password-reset token
///
/// POST /api/v1/auth/forgot-password
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>> {
    if req.email.is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }

    let user = state
        .db
        .users()
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;

    let reset_token = issue_reset_token(&state.jwt_secret, &user.id, chrono::Duration::hours(1))?;

    Ok(Json(ForgotPasswordResponse { reset_token }))
}

/// Reset-password request
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub new_password: String,
}

/// Reset-password response
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub message: &'static str,
}

/// Set a new password using a reset token
///
/// POST /api/v1/auth/reset-password
async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>> {
    if req.token.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::bad_request("token and new_password are required"));
    }
    if req.new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(
            "new_password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }

    let user_id = verify_reset_token(&state.jwt_secret, &req.token)?;

    let updated = state
        .db
        .users()
        .update_password(&user_id, &req.new_password)
        .await?;

    if !updated {
        return Err(ApiError::not_found("user"));
    }

    Ok(Json(ResetPasswordResponse {
        message: "Password updated successfully",
    }))
}
