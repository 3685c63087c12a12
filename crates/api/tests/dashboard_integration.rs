//! Integration tests for view tracking and the dashboard
//!
//! Tests: self-view no-op, rolling counters, visitor listing, stats totals.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use bizlink_store::BusinessRole;
use common::{onboard_user, response_json, send, token_for, test_app};

#[tokio::test]
async fn test_track_view_and_rolling_counter() {
    let (app, db) = test_app().await;
    let viewer = onboard_user(&db, "viewer@x.com", BusinessRole::Seller, "textiles", "Pune").await;
    let viewed =
        onboard_user(&db, "viewed@x.com", BusinessRole::Investor, "textiles", "Pune").await;
    let token = token_for(&viewer);

    for _ in 0..3 {
        let response = send(
            &app,
            Method::POST,
            "/api/v1/views",
            Some(&token),
            Some(json!({ "viewed_user_id": viewed.id, "source": "suggestion" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // One rolling row, counter at three
    let log = db.views().get(&viewer.id, &viewed.id).await.unwrap().unwrap();
    assert_eq!(log.view_count, 3);
}

#[tokio::test]
async fn test_track_view_validations() {
    let (app, db) = test_app().await;
    let viewer = onboard_user(&db, "viewer@x.com", BusinessRole::Seller, "textiles", "Pune").await;
    let token = token_for(&viewer);

    // Missing target
    let response = send(&app, Method::POST, "/api/v1/views", Some(&token), Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown target
    let response = send(
        &app,
        Method::POST,
        "/api/v1/views",
        Some(&token),
        Some(json!({ "viewed_user_id": "no-such-user" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unknown source
    let other = onboard_user(&db, "o@x.com", BusinessRole::Investor, "textiles", "Pune").await;
    let response = send(
        &app,
        Method::POST,
        "/api/v1/views",
        Some(&token),
        Some(json!({ "viewed_user_id": other.id, "source": "billboard" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_self_view_not_tracked() {
    let (app, db) = test_app().await;
    let viewer = onboard_user(&db, "viewer@x.com", BusinessRole::Seller, "textiles", "Pune").await;
    let token = token_for(&viewer);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/views",
        Some(&token),
        Some(json!({ "viewed_user_id": viewer.id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Self-view not tracked");

    assert!(db.views().get(&viewer.id, &viewer.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_visitors_listing() {
    let (app, db) = test_app().await;
    let viewed = onboard_user(&db, "viewed@x.com", BusinessRole::Seller, "textiles", "Pune").await;
    let v1 = onboard_user(&db, "v1@x.com", BusinessRole::Investor, "textiles", "Pune").await;
    let v2 = onboard_user(&db, "v2@x.com", BusinessRole::Consultant, "steel", "Delhi").await;

    db.views()
        .record_view(&v1.id, &viewed.id, bizlink_store::ViewSource::Profile)
        .await
        .unwrap();
    db.views()
        .record_view(&v2.id, &viewed.id, bizlink_store::ViewSource::Search)
        .await
        .unwrap();

    let response = send(
        &app,
        Method::GET,
        "/api/v1/dashboard/visitors",
        Some(&token_for(&viewed)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["total_count"], 2);
    let visitor_ids: Vec<&str> = body["visitors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["user_id"].as_str().unwrap())
        .collect();
    assert!(visitor_ids.contains(&v1.id.as_str()));
    assert!(visitor_ids.contains(&v2.id.as_str()));

    // Limit applies
    let response = send(
        &app,
        Method::GET,
        "/api/v1/dashboard/visitors?limit=1",
        Some(&token_for(&viewed)),
        None,
    )
    .await;
    let body = response_json(response).await;
    assert_eq!(body["total_count"], 1);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let (app, db) = test_app().await;
    let user = onboard_user(&db, "user@x.com", BusinessRole::Seller, "textiles", "Pune").await;
    let inv1 = onboard_user(&db, "inv1@x.com", BusinessRole::Investor, "textiles", "Pune").await;
    let inv2 = onboard_user(&db, "inv2@x.com", BusinessRole::Investor, "steel", "Delhi").await;

    // Two viewers today
    db.views()
        .record_view(&inv1.id, &user.id, bizlink_store::ViewSource::Profile)
        .await
        .unwrap();
    db.views()
        .record_view(&inv2.id, &user.id, bizlink_store::ViewSource::Profile)
        .await
        .unwrap();

    // One accepted connection, one pending received
    let r1 = db.ledger().create(&user.id, &inv1.id, None).await.unwrap();
    db.ledger()
        .respond(&r1.id, &inv1.id, bizlink_store::RequestAction::Accept)
        .await
        .unwrap();
    db.ledger().create(&inv2.id, &user.id, None).await.unwrap();

    let response = send(
        &app,
        Method::GET,
        "/api/v1/dashboard/stats",
        Some(&token_for(&user)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["overall_views"], 2);
    assert_eq!(body["today_views"], 2);
    assert_eq!(body["connections"]["total"], 1);
    assert_eq!(body["requests_sent"]["total"], 1);
    assert_eq!(body["requests_received"]["total"], 1);
    assert_eq!(body["requests_received"]["pending"], 1);
    assert_eq!(body["requests_sent"]["trend"], "up");
}
