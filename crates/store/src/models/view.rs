//! Profile-view log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the view originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSource {
    Profile,
    Search,
    Suggestion,
    Connection,
    Dashboard,
}

impl ViewSource {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "profile" => Some(Self::Profile),
            "search" => Some(Self::Search),
            "suggestion" => Some(Self::Suggestion),
            "connection" => Some(Self::Connection),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Search => "search",
            Self::Suggestion => "suggestion",
            Self::Connection => "connection",
            Self::Dashboard => "dashboard",
        }
    }
}

impl Default for ViewSource {
    fn default() -> Self {
        Self::Profile
    }
}

impl std::fmt::Display for ViewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rolling view record per (viewer, viewed) pair
///
/// Repeat views bump `view_count` and refresh `viewed_at` instead of creating
/// new rows.
#[derive(Debug, Clone, Serialize)]
pub struct ViewLog {
    pub viewer: String,
    pub viewed_user: String,
    pub source: ViewSource,
    /// Most recent view time
    pub viewed_at: DateTime<Utc>,
    pub view_count: i64,
}
