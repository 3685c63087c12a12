//! Shared helpers for API integration tests
//!
//! Builds the real router over an in-memory database and signs real JWTs, so
//! the tests exercise the production code paths end to end.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;

use bizlink_api::{AppState, build_router};
use bizlink_auth::test_utils::TEST_SECRET;
use bizlink_auth::issue_access_token;
use bizlink_store::{BusinessRole, Database, NewUser, RoleProfile, Step1Details, User};

/// Router plus the database handle backing it, for direct seeding
pub async fn test_app() -> (Router, Database) {
    let db = Database::in_memory().await.unwrap();
    let state = AppState::new(db.clone(), TEST_SECRET, Duration::from_secs(3600));
    (build_router(state), db)
}

/// Create a registered (but not onboarded) user directly in the store
pub async fn register_user(db: &Database, email: &str) -> User {
    db.users()
        .create_user(&NewUser {
            email: email.to_string(),
            password: "password123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: "+91-0000000000".to_string(),
        })
        .await
        .unwrap()
}

/// Create a fully onboarded user with the given role, industry and city
pub async fn onboard_user(
    db: &Database,
    email: &str,
    role: BusinessRole,
    industry: &str,
    city: &str,
) -> User {
    let user = register_user(db, email).await;

    db.users()
        .save_step1(
            &user.id,
            &Step1Details {
                company_name: format!("{} Co", email),
                pin_code: "411001".to_string(),
                gst_or_cin: "GST123".to_string(),
                city: Some(city.to_string()),
                state: Some("Maharashtra".to_string()),
                country: Some("India".to_string()),
                industry: Some(industry.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    db.users().save_step2(&user.id, "About the company.").await.unwrap();
    db.users().set_role(&user.id, role).await.unwrap();
    db.users()
        .save_role_details(&user.id, &RoleProfile::empty_for(role))
        .await
        .unwrap()
}

/// A valid access token for a stored user
pub fn token_for(user: &User) -> String {
    issue_access_token(
        TEST_SECRET,
        &user.id,
        &user.email,
        user.role.as_str(),
        user.profile_completed,
        user.is_verified,
        chrono::Duration::hours(1),
    )
    .unwrap()
}

/// Fire one request at the router
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Decode a response body as JSON
pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
