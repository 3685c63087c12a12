//! View tracking and dashboard routes
//!
//! Profile views roll up into one counter row per viewer/viewed pair. The
//! dashboard reads those rows plus the ledger for the caller's activity
//! summary.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use bizlink_store::{UserSummary, ViewSource};

use crate::error::{ApiError, Result};
use crate::extract::ActiveUser;
use crate::state::AppState;

/// View-tracking routes (nested under /api/v1/views)
pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(track_view))
}

/// Dashboard routes (nested under /api/v1/dashboard)
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .route("/visitors", get(recent_visitors))
}

// =============================================================================
// Track view
// =============================================================================

/// Track-view request
#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    #[serde(default)]
    pub viewed_user_id: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Track-view response
#[derive(Debug, Serialize)]
pub struct TrackViewResponse {
    pub message: &'static str,
}

/// Record that the caller viewed another user's profile
///
/// POST /api/v1/views
///
/// Self-views succeed without being recorded.
async fn track_view(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<TrackViewRequest>,
) -> Result<Json<TrackViewResponse>> {
    if req.viewed_user_id.is_empty() {
        return Err(ApiError::bad_request("viewed_user_id is required"));
    }

    if req.viewed_user_id == user.id {
        return Ok(Json(TrackViewResponse {
            message: "Self-view not tracked",
        }));
    }

    state
        .db
        .users()
        .get_by_id(&req.viewed_user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;

    let source = match req.source.as_deref() {
        None | Some("") => ViewSource::default(),
        Some(s) => ViewSource::parse(s)
            .ok_or_else(|| ApiError::validation("source", "unknown view source"))?,
    };

    state
        .db
        .views()
        .record_view(&user.id, &req.viewed_user_id, source)
        .await?;

    Ok(Json(TrackViewResponse {
        message: "View tracked successfully",
    }))
}

// =============================================================================
// Dashboard
// =============================================================================

/// Trend direction for a counter
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    fn from_delta(delta: i64) -> Self {
        match delta {
            d if d > 0 => Self::Up,
            d if d < 0 => Self::Down,
            _ => Self::Stable,
        }
    }
}

/// Connection stats block
#[derive(Debug, Serialize)]
pub struct ConnectionStats {
    pub total: u64,
    pub weekly_change: u64,
    pub trend: Trend,
}

/// Sent-request stats block
#[derive(Debug, Serialize)]
pub struct RequestsSentStats {
    pub total: u64,
    pub weekly_new: u64,
    pub trend: Trend,
}

/// Received-request stats block
#[derive(Debug, Serialize)]
pub struct RequestsReceivedStats {
    pub total: u64,
    pub responded: u64,
    pub pending: u64,
    pub trend: Trend,
}

/// Dashboard stats response
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub overall_views: u64,
    pub today_views: u64,
    pub today_change: i64,
    pub last_5_days_views: u64,
    pub connections: ConnectionStats,
    pub requests_sent: RequestsSentStats,
    pub requests_received: RequestsReceivedStats,
}

/// Activity summary for the caller
///
/// GET /api/v1/dashboard/stats
async fn dashboard_stats(
    user: ActiveUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardStatsResponse>> {
    let now = Utc::now();
    let today = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
    let yesterday = today - Duration::days(1);
    let last_5_days = today - Duration::days(5);
    let last_week = today - Duration::days(7);

    let views = state.db.views();
    let overall_views = views.total_views(&user.id).await?;
    let today_views = views.views_since(&user.id, today).await?;
    let yesterday_views = views.views_between(&user.id, yesterday, today).await?;
    let last_5_days_views = views.views_since(&user.id, last_5_days).await?;

    let ledger = state.db.ledger();
    let total_connections = state.db.users().connection_count(&user.id).await?;
    let sent = ledger.count_sent(&user.id).await?;
    let received = ledger.count_received(&user.id).await?;
    let pending = ledger.count_pending_received(&user.id).await?;
    let weekly_sent = ledger.count_sent_since(&user.id, last_week).await?;

    Ok(Json(DashboardStatsResponse {
        overall_views,
        today_views,
        today_change: today_views as i64 - yesterday_views as i64,
        last_5_days_views,
        connections: ConnectionStats {
            total: total_connections,
            weekly_change: weekly_sent,
            trend: Trend::from_delta(weekly_sent as i64),
        },
        requests_sent: RequestsSentStats {
            total: sent,
            weekly_new: weekly_sent,
            trend: Trend::from_delta(weekly_sent as i64),
        },
        requests_received: RequestsReceivedStats {
            total: received,
            responded: received.saturating_sub(pending),
            pending,
            trend: Trend::from_delta(pending as i64),
        },
    }))
}

/// Visitors query
#[derive(Debug, Deserialize)]
pub struct VisitorsQuery {
    #[serde(default = "default_visitors_limit")]
    pub limit: u32,
}

fn default_visitors_limit() -> u32 {
    5
}

/// A recent visitor
#[derive(Debug, Serialize)]
pub struct VisitorResponse {
    #[serde(flatten)]
    pub visitor: UserSummary,
    pub visited_at: DateTime<Utc>,
}

/// Visitors response
#[derive(Debug, Serialize)]
pub struct VisitorsListResponse {
    pub visitors: Vec<VisitorResponse>,
    pub total_count: usize,
}

/// Recent profile visitors, newest first
///
/// GET /api/v1/dashboard/visitors?limit=
async fn recent_visitors(
    user: ActiveUser,
    State(state): State<AppState>,
    Query(query): Query<VisitorsQuery>,
) -> Result<Json<VisitorsListResponse>> {
    let views = state.db.views().recent_viewers(&user.id, query.limit).await?;

    let viewer_ids: Vec<String> = views.iter().map(|v| v.viewer.clone()).collect();
    let viewers = state.db.users().get_many(&viewer_ids).await?;

    let visitors: Vec<VisitorResponse> = views
        .iter()
        .filter_map(|view| {
            let viewer = viewers.iter().find(|u| u.id == view.viewer)?;
            Some(VisitorResponse {
                visitor: viewer.summary(),
                visited_at: view.viewed_at,
            })
        })
        .collect();

    Ok(Json(VisitorsListResponse {
        total_count: visitors.len(),
        visitors,
    }))
}
