//! Bizlink API
//!
//! HTTP API for the B2B matchmaking service. Built on Axum over the
//! `bizlink-store` persistence layer and the `bizlink-engine` suggestion
//! engine.
//!
//! # Usage
//!
//! ```ignore
//! use bizlink_api::{build_router, AppState};
//! use bizlink_store::Database;
//!
//! let db = Database::open("data/bizlink.db").await?;
//! let state = AppState::new(db, jwt_secret, jwt_expires_in);
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! ## Auth (public)
//! - `POST /api/v1/auth/register` - Create an account
//! - `POST /api/v1/auth/login` - Exchange credentials for a token
//! - `POST /api/v1/auth/logout` - Clear the auth cookie
//! - `POST /api/v1/auth/forgot-password` - Issue a reset token
//! - `POST /api/v1/auth/reset-password` - Set a new password with a reset token
//!
//! ## Profile
//! - `GET|PUT /api/v1/profile/me` - Read/update own profile
//! - `POST|GET /api/v1/profile/step1` - Company details
//! - `POST|GET /api/v1/profile/step2` - Business description
//! - `POST /api/v1/profile/role` - Select the business role (once)
//! - `POST /api/v1/profile/details` - Role-specific details
//!
//! ## Connections
//! - `POST /api/v1/requests` - Send a connection request
//! - `GET /api/v1/requests/sent` - Sent requests
//! - `GET /api/v1/requests/pending` - Pending received requests
//! - `POST /api/v1/requests/{id}/respond` - Accept or decline
//! - `POST /api/v1/requests/{id}/withdraw` - Withdraw
//! - `GET /api/v1/connections` - Accepted connections
//!
//! ## Suggestions (completed profile required)
//! - `GET /api/v1/suggestions` - Ranked match candidates
//! - `POST /api/v1/suggestions/feedback` - Record feedback (inert)
//!
//! ## Notifications, views, dashboard
//! - `POST|GET|DELETE /api/v1/notifications`, `/count`, `/read-all`,
//!   `/{id}/read`, `/{id}`
//! - `POST /api/v1/views` - Track a profile view
//! - `GET /api/v1/dashboard/stats`, `/api/v1/dashboard/visitors`

pub mod error;
pub mod extract;
pub mod notify;
pub mod routes;
pub mod state;

// Re-exports
pub use error::{ApiError, Result};
pub use extract::{ActiveUser, AuthUser, CompletedUser};
pub use routes::build_router;
pub use state::AppState;
