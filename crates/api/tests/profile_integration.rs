//! Integration tests for the onboarding flow
//!
//! Tests: step progression, role selection rules, profile completion gating.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{register_user, response_json, send, token_for, test_app};

#[tokio::test]
async fn test_full_onboarding_flow() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    // Step 1: company details
    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/step1",
        Some(&token),
        Some(json!({
            "company_name": "Rao Textiles",
            "pin_code": "411001",
            "gst_or_cin": "GST123",
            "city": "Pune",
            "state": "Maharashtra",
            "country": "India",
            "industry": "textiles"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["step"], 1);
    assert_eq!(body["profile_completed"], false);

    // Step 2: business description
    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/step2",
        Some(&token),
        Some(json!({ "business_description": "We weave and export textiles." })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Step 3: role selection
    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/role",
        Some(&token),
        Some(json!({ "business_type": "seller" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["role"], "seller");

    // Step 4: role-specific details complete the profile
    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/details",
        Some(&token),
        Some(json!({
            "role": "seller",
            "investment_required": 500000,
            "sale_type": "Partial Sale"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["profile_completed"], true);

    // The profile reflects everything
    let response = send(&app, Method::GET, "/api/v1/profile/me", Some(&token), None).await;
    let body = response_json(response).await;
    assert_eq!(body["company_name"], "Rao Textiles");
    assert_eq!(body["role"], "seller");
    assert_eq!(body["profile"]["investment_required"], 500000);
    assert_eq!(body["profile_completed"], true);
}

#[tokio::test]
async fn test_step1_requires_company_fields() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/step1",
        Some(&token),
        Some(json!({ "company_name": "Rao Textiles" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_role_rejected() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/role",
        Some(&token),
        Some(json!({ "business_type": "wizard" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // "pending" cannot be selected either
    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/role",
        Some(&token),
        Some(json!({ "business_type": "pending" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_role_switch_conflicts() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/role",
        Some(&token),
        Some(json!({ "business_type": "seller" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/role",
        Some(&token),
        Some(json!({ "business_type": "investor" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_details_payload_must_match_role() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    send(
        &app,
        Method::POST,
        "/api/v1/profile/role",
        Some(&token),
        Some(json!({ "business_type": "seller" })),
    )
    .await;

    // Investor payload on a seller account
    let response = send(
        &app,
        Method::POST,
        "/api/v1/profile/details",
        Some(&token),
        Some(json!({ "role": "investor", "investment_fund_size": 1000000 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_profile_patch() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/profile/me",
        Some(&token),
        Some(json!({ "city": "Mumbai", "website": "https://rao.example" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["city"], "Mumbai");
    assert_eq!(body["website"], "https://rao.example");
    // Untouched identity fields survive
    assert_eq!(body["email"], "founder@example.com");
}

#[tokio::test]
async fn test_step_getters() {
    let (app, db) = test_app().await;
    let user = register_user(&db, "founder@example.com").await;
    let token = token_for(&user);

    let response = send(&app, Method::GET, "/api/v1/profile/step1", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["step1_completed"], false);

    let response = send(&app, Method::GET, "/api/v1/profile/step2", Some(&token), None).await;
    let body = response_json(response).await;
    assert_eq!(body["step2_completed"], false);
}
