//! Application state
//!
//! Shared state for API handlers: the database handle, the suggestion engine,
//! and the auth provider. Constructed once at startup and cloned per request.

use std::sync::Arc;
use std::time::Duration;

use bizlink_auth::{AuthProvider, LocalJwtProvider};
use bizlink_engine::SuggestionEngine;
use bizlink_store::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database handle (pooled, cheap to clone)
    pub db: Database,
    /// Suggestion engine over the same database
    pub engine: SuggestionEngine,
    /// Token validator
    pub auth: Arc<dyn AuthProvider>,
    /// JWT signing secret
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime
    pub jwt_expires_in: Duration,
}

impl AppState {
    /// Create application state with the local JWT provider
    pub fn new(db: Database, jwt_secret: &[u8], jwt_expires_in: Duration) -> Self {
        let auth = Arc::new(LocalJwtProvider::new(jwt_secret));
        let engine = SuggestionEngine::new(db.clone());

        Self {
            db,
            engine,
            auth,
            jwt_secret: jwt_secret.to_vec(),
            jwt_expires_in,
        }
    }

    /// Access token lifetime as chrono duration (for claim timestamps)
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.jwt_expires_in)
            .unwrap_or_else(|_| chrono::Duration::hours(24))
    }
}
