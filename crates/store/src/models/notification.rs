//! Notification model
//!
//! Delivery records addressed to one user. A `dedupe_key` makes creation
//! idempotent per (user, key) pair.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored notification
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Notification ID (UUID)
    pub id: String,
    /// Recipient
    pub user_id: String,
    /// Event kind, e.g. "connection_request", "connection_response"
    pub kind: String,
    pub title: String,
    pub body: String,
    /// Free-form event payload
    pub data: Option<serde_json::Value>,
    pub icon: Option<String>,
    pub link: Option<String>,
    /// Producing subsystem, e.g. "connection"
    pub source: Option<String>,
    /// Idempotency token, unique per user when present
    pub dedupe_key: Option<String>,
    pub is_read: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub icon: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub dedupe_key: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewNotification {
    /// Create a notification input with the required fields
    pub fn new(
        user_id: impl Into<String>,
        kind: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind: kind.into(),
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Attach an event payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach an icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Attach a link target
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attach a dedupe key
    pub fn with_dedupe_key(mut self, key: impl Into<String>) -> Self {
        self.dedupe_key = Some(key.into());
        self
    }

    /// Set the producing subsystem
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Outcome of a notification create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new record was written
    Created(String),
    /// A record with the same (user, dedupe key) already existed; no-op
    Deduped,
}

impl CreateOutcome {
    /// Whether the create was skipped due to the dedupe key
    pub fn is_deduped(&self) -> bool {
        matches!(self, Self::Deduped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let input = NewNotification::new("u1", "connection_request", "New request", "Asha sent you a request")
            .with_icon("🤝")
            .with_link("/connections/requests")
            .with_dedupe_key("req-123")
            .with_source("connection");

        assert_eq!(input.user_id, "u1");
        assert_eq!(input.kind, "connection_request");
        assert_eq!(input.dedupe_key.as_deref(), Some("req-123"));
        assert_eq!(input.source.as_deref(), Some("connection"));
        assert!(input.expires_at.is_none());
    }

    #[test]
    fn test_outcome() {
        assert!(CreateOutcome::Deduped.is_deduped());
        assert!(!CreateOutcome::Created("id".to_string()).is_deduped());
    }
}
