//! Bizlink persistence
//!
//! SQLite-backed storage for the matchmaking service, one store per concern:
//!
//! | Store | Contains |
//! |-------|----------|
//! | [`UserStore`] | User identity, company profile, role payload, derived connection cache |
//! | [`LedgerStore`] | Directed connection requests and their lifecycle |
//! | [`ViewStore`] | Profile-view log, one rolling row per viewer/viewed pair |
//! | [`NotificationStore`] | Per-user delivery records with optional dedupe keys |
//!
//! # Usage
//!
//! ```ignore
//! use bizlink_store::Database;
//!
//! // File-based (production)
//! let db = Database::open("data/bizlink.db").await?;
//!
//! // In-memory (testing)
//! let db = Database::in_memory().await?;
//!
//! let user = db.users().get_by_email("founder@example.com").await?;
//! ```
//!
//! The [`Database`] handle is constructed once at startup and injected; there
//! is no process-global connection state.

pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod notifications;
pub mod users;
pub mod views;

// Re-exports
pub use db::Database;
pub use error::{Result, StoreError};
pub use ledger::LedgerStore;
pub use models::{
    BusinessRole, ConnectionRequest, ConsultantProfile, CreateOutcome, FranchiseProfile,
    ImpexpProfile, InvestorProfile, NewNotification, NewUser, Notification, RequestAction,
    RequestStatus, RoleProfile, SellerProfile, StartupProfile, Step1Details, TradeGood,
    UpdateProfile, User, UserSummary, ViewLog, ViewSource, DEFAULT_AVATAR,
};
pub use notifications::NotificationStore;
pub use users::UserStore;
pub use views::ViewStore;
