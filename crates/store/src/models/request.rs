//! Connection request model
//!
//! A directed edge between two users with a single lifecycle transition:
//! pending, then exactly one of accepted/declined (by the recipient) or
//! withdrawn (by the sender).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for the recipient to respond
    Pending,
    /// Recipient accepted; both users are now connected
    Accepted,
    /// Recipient declined
    Declined,
    /// Sender withdrew before a response
    Withdrawn,
}

impl RequestStatus {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// A live edge still blocks a new request between the pair
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recipient's response to a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Accept,
    Decline,
}

impl RequestAction {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "accept" => Some(Self::Accept),
            "decline" => Some(Self::Decline),
            _ => None,
        }
    }

    /// Status this action transitions the request into
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Self::Accept => RequestStatus::Accepted,
            Self::Decline => RequestStatus::Declined,
        }
    }
}

/// A stored connection request
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRequest {
    /// Request ID (UUID)
    pub id: String,
    /// Sending user
    pub from_user: String,
    /// Receiving user
    pub to_user: String,
    pub status: RequestStatus,
    /// Optional message from the sender
    pub message: Option<String>,
    pub sent_at: DateTime<Utc>,
    /// Set on accept/decline/withdraw
    pub responded_at: Option<DateTime<Utc>>,
}

impl ConnectionRequest {
    /// Create a new pending request
    pub fn new(from_user: &str, to_user: &str, message: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from_user: from_user.to_string(),
            to_user: to_user.to_string(),
            status: RequestStatus::Pending,
            message,
            sent_at: Utc::now(),
            responded_at: None,
        }
    }

    /// The other user on this edge
    pub fn peer_of(&self, user_id: &str) -> &str {
        if self.from_user == user_id {
            &self.to_user
        } else {
            &self.from_user
        }
    }
}
