//! API routes
//!
//! Domain-grouped HTTP route handlers.

pub mod auth;
pub mod notifications;
pub mod ops;
pub mod profile;
pub mod requests;
pub mod suggestions;
pub mod views;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health (no auth)
        .merge(ops::routes())
        // Auth routes (register, login, password reset)
        .nest("/api/v1/auth", auth::routes())
        // Profile and onboarding
        .nest("/api/v1/profile", profile::routes())
        // Connection requests and accepted connections
        .nest("/api/v1/requests", requests::routes())
        .nest("/api/v1/connections", requests::connection_routes())
        // Suggestions
        .nest("/api/v1/suggestions", suggestions::routes())
        // Notifications
        .nest("/api/v1/notifications", notifications::routes())
        // Profile views and dashboard
        .nest("/api/v1/views", views::routes())
        .nest("/api/v1/dashboard", views::dashboard_routes())
        .with_state(state)
}
