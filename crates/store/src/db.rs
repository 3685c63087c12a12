//! Database connection and schema management
//!
//! A single SQLite database holds all four stores. The handle is created at
//! startup and injected through application state; it is cheap to clone (the
//! pool is reference-counted).

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::ledger::LedgerStore;
use crate::notifications::NotificationStore;
use crate::users::UserStore;
use crate::views::ViewStore;

/// Shared database handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path
    ///
    /// Creates the file, parent directories, and tables if they don't exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Database(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    ///
    /// A single pooled connection, so every query sees the same memory DB.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User directory store
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.pool)
    }

    /// Connection request ledger
    pub fn ledger(&self) -> LedgerStore<'_> {
        LedgerStore::new(&self.pool)
    }

    /// Profile-view log
    pub fn views(&self) -> ViewStore<'_> {
        ViewStore::new(&self.pool)
    }

    /// Notification sink
    pub fn notifications(&self) -> NotificationStore<'_> {
        NotificationStore::new(&self.pool)
    }

    /// Initialize the database schema
    async fn init_schema(&self) -> Result<()> {
        for statement in [
            SCHEMA_USERS,
            INDEX_USERS_EMAIL,
            INDEX_USERS_ROLE,
            INDEX_USERS_INDUSTRY,
            INDEX_USERS_LOCATION,
            SCHEMA_CONNECTIONS,
            SCHEMA_REQUESTS,
            INDEX_REQUESTS_TO_STATUS,
            INDEX_REQUESTS_FROM_STATUS,
            SCHEMA_VIEW_LOGS,
            INDEX_VIEWS_VIEWED,
            SCHEMA_NOTIFICATIONS,
            INDEX_NOTIFICATIONS_USER,
            INDEX_NOTIFICATIONS_UNREAD,
            INDEX_NOTIFICATIONS_DEDUPE,
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        debug!("Database schema initialized");
        Ok(())
    }
}

// =============================================================================
// Schema - User Directory
// =============================================================================

const SCHEMA_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT NOT NULL,
    company_name TEXT,
    website TEXT,
    linkedin_profile TEXT,
    city TEXT,
    state TEXT,
    country TEXT,
    pin_code TEXT,
    company_type TEXT,
    year_of_registration INTEGER,
    industry TEXT,
    brief_introduction TEXT,
    business_description TEXT,
    gst_or_cin TEXT,
    profile_picture TEXT,
    role TEXT NOT NULL DEFAULT 'pending',
    role_profile TEXT NOT NULL DEFAULT '{"role":"pending"}',
    step1_completed INTEGER NOT NULL DEFAULT 0,
    step2_completed INTEGER NOT NULL DEFAULT 0,
    step3_completed INTEGER NOT NULL DEFAULT 0,
    step4_completed INTEGER NOT NULL DEFAULT 0,
    is_verified INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    profile_completed INTEGER NOT NULL DEFAULT 0,
    last_login TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const INDEX_USERS_EMAIL: &str = "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)";

const INDEX_USERS_ROLE: &str = "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)";

const INDEX_USERS_INDUSTRY: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_industry ON users(industry)";

const INDEX_USERS_LOCATION: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_location ON users(city, state, country)";

/// Denormalized cache of accepted edges, both directions materialized
const SCHEMA_CONNECTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS connections (
    user_id TEXT NOT NULL,
    peer_id TEXT NOT NULL,
    connected_at TEXT NOT NULL,
    PRIMARY KEY (user_id, peer_id)
)
"#;

// =============================================================================
// Schema - Connection Ledger
// =============================================================================

const SCHEMA_REQUESTS: &str = r#"
CREATE TABLE IF NOT EXISTS connection_requests (
    id TEXT PRIMARY KEY,
    from_user TEXT NOT NULL,
    to_user TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    message TEXT,
    sent_at TEXT NOT NULL,
    responded_at TEXT,
    UNIQUE (from_user, to_user)
)
"#;

const INDEX_REQUESTS_TO_STATUS: &str =
    "CREATE INDEX IF NOT EXISTS idx_requests_to_status ON connection_requests(to_user, status)";

const INDEX_REQUESTS_FROM_STATUS: &str =
    "CREATE INDEX IF NOT EXISTS idx_requests_from_status ON connection_requests(from_user, status)";

// =============================================================================
// Schema - View Log
// =============================================================================

/// One rolling row per (viewer, viewed_user); repeat views upsert
const SCHEMA_VIEW_LOGS: &str = r#"
CREATE TABLE IF NOT EXISTS view_logs (
    viewer TEXT NOT NULL,
    viewed_user TEXT NOT NULL,
    source TEXT NOT NULL DEFAULT 'profile',
    viewed_at TEXT NOT NULL,
    view_count INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (viewer, viewed_user)
)
"#;

const INDEX_VIEWS_VIEWED: &str =
    "CREATE INDEX IF NOT EXISTS idx_views_viewed ON view_logs(viewed_user, viewed_at)";

// =============================================================================
// Schema - Notifications
// =============================================================================

const SCHEMA_NOTIFICATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    data TEXT,
    icon TEXT,
    link TEXT,
    source TEXT,
    dedupe_key TEXT,
    is_read INTEGER NOT NULL DEFAULT 0,
    expires_at TEXT,
    created_at TEXT NOT NULL
)
"#;

const INDEX_NOTIFICATIONS_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at)";

const INDEX_NOTIFICATIONS_UNREAD: &str =
    "CREATE INDEX IF NOT EXISTS idx_notifications_unread ON notifications(user_id, is_read)";

/// Unique dedupe per user, only enforced when a key is present
const INDEX_NOTIFICATIONS_DEDUPE: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_notifications_dedupe
ON notifications(user_id, dedupe_key)
WHERE dedupe_key IS NOT NULL
"#;
