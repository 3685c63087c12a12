//! Connection request routes
//!
//! Send/respond/withdraw flows plus the sent, pending, and accepted listings.
//! Status transitions notify the other party as a best-effort final step.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizlink_store::{ConnectionRequest, Database, RequestAction, RequestStatus, UserSummary};

use crate::error::{ApiError, Result};
use crate::extract::ActiveUser;
use crate::notify;
use crate::state::AppState;

/// Request routes (nested under /api/v1/requests)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(send_request).get(list_sent))
        .route("/sent", get(list_sent))
        .route("/pending", get(list_pending))
        .route("/{id}/respond", post(respond_to_request))
        .route("/{id}/withdraw", post(withdraw_request))
}

/// Accepted-connection routes (nested under /api/v1/connections)
pub fn connection_routes() -> Router<AppState> {
    Router::new().route("/", get(list_connections))
}

// =============================================================================
// Send
// =============================================================================

/// Send request body
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub to_user_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Send response
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub request_id: String,
    pub status: RequestStatus,
    pub sent_at: DateTime<Utc>,
}

/// Send a connection request
///
/// POST /api/v1/requests
async fn send_request(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<SendResponse>)> {
    if req.to_user_id.is_empty() {
        return Err(ApiError::bad_request("to_user_id is required"));
    }

    // The recipient must still exist
    state
        .db
        .users()
        .get_by_id(&req.to_user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;

    let request = state
        .db
        .ledger()
        .create(&user.id, &req.to_user_id, req.message)
        .await?;

    notify::notify_best_effort(&state.db, notify::request_sent(&request, &user.0)).await;

    Ok((
        StatusCode::CREATED,
        Json(SendResponse {
            request_id: request.id.clone(),
            status: request.status,
            sent_at: request.sent_at,
        }),
    ))
}

// =============================================================================
// Respond / withdraw
// =============================================================================

/// Respond body
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    #[serde(default)]
    pub action: String,
}

/// Status-transition response
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub request_id: String,
    pub status: RequestStatus,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Accept or decline a pending request
///
/// POST /api/v1/requests/{id}/respond
///
/// Only the recipient may respond; a request that is no longer pending is a
/// conflict.
async fn respond_to_request(
    user: ActiveUser,
    Path(request_id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<TransitionResponse>> {
    if req.action.is_empty() {
        return Err(ApiError::bad_request("action is required"));
    }
    let action = RequestAction::parse(&req.action).ok_or_else(|| {
        ApiError::validation("action", "must be either \"accept\" or \"decline\"")
    })?;

    let request = state.db.ledger().respond(&request_id, &user.id, action).await?;

    let accepted = request.status == RequestStatus::Accepted;
    notify::notify_best_effort(&state.db, notify::request_responded(&request, &user.0, accepted))
        .await;

    Ok(Json(TransitionResponse {
        request_id: request.id.clone(),
        status: request.status,
        responded_at: request.responded_at,
    }))
}

/// Withdraw a pending request
///
/// POST /api/v1/requests/{id}/withdraw
///
/// Only the sender may withdraw; a request that is no longer pending is a
/// conflict.
async fn withdraw_request(
    user: ActiveUser,
    Path(request_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TransitionResponse>> {
    let request = state.db.ledger().withdraw(&request_id, &user.id).await?;

    notify::notify_best_effort(&state.db, notify::request_withdrawn(&request, &user.0)).await;

    Ok(Json(TransitionResponse {
        request_id: request.id.clone(),
        status: request.status,
        responded_at: request.responded_at,
    }))
}

// =============================================================================
// Listings
// =============================================================================

/// Pagination query for sent requests
#[derive(Debug, Deserialize)]
pub struct SentQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// A sent request with the recipient's summary
#[derive(Debug, Serialize)]
pub struct SentRequestResponse {
    pub request_id: String,
    pub to_user: UserSummary,
    pub status: RequestStatus,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Sent-requests listing
#[derive(Debug, Serialize)]
pub struct SentListResponse {
    pub requests: Vec<SentRequestResponse>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// List requests sent by the caller
///
/// GET /api/v1/requests/sent?page=&limit=
async fn list_sent(
    user: ActiveUser,
    State(state): State<AppState>,
    Query(query): Query<SentQuery>,
) -> Result<Json<SentListResponse>> {
    let (requests, total_count) = state
        .db
        .ledger()
        .list_sent(&user.id, query.page, query.limit)
        .await?;

    let peers = load_peer_summaries(&state.db, &requests, &user.id).await?;

    let requests: Vec<SentRequestResponse> = requests
        .into_iter()
        .filter_map(|request| {
            let to_user = peers.get(&request.to_user)?.clone();
            Some(SentRequestResponse {
                request_id: request.id,
                to_user,
                status: request.status,
                message: request.message.unwrap_or_default(),
                sent_at: request.sent_at,
                responded_at: request.responded_at,
            })
        })
        .collect();

    Ok(Json(SentListResponse {
        requests,
        total_count,
        page: query.page,
        limit: query.limit,
        has_more: (query.page as u64) * (query.limit as u64) < total_count,
    }))
}

/// Query for pending requests
#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    #[serde(default = "default_pending_limit")]
    pub limit: u32,
}

fn default_pending_limit() -> u32 {
    6
}

/// Sender summary with their connection count
#[derive(Debug, Serialize)]
pub struct PendingSender {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub connections_count: u64,
}

/// A pending received request
#[derive(Debug, Serialize)]
pub struct PendingRequestResponse {
    pub request_id: String,
    pub from_user: PendingSender,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// Pending-requests listing
#[derive(Debug, Serialize)]
pub struct PendingListResponse {
    pub requests: Vec<PendingRequestResponse>,
    pub total_count: usize,
}

/// List pending requests received by the caller
///
/// GET /api/v1/requests/pending?limit=
async fn list_pending(
    user: ActiveUser,
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<PendingListResponse>> {
    let requests = state
        .db
        .ledger()
        .list_pending_received(&user.id, query.limit)
        .await?;

    let peers = load_peer_summaries(&state.db, &requests, &user.id).await?;

    let mut formatted = Vec::with_capacity(requests.len());
    for request in requests {
        let Some(summary) = peers.get(&request.from_user).cloned() else {
            continue;
        };
        let connections_count = state.db.users().connection_count(&request.from_user).await?;

        formatted.push(PendingRequestResponse {
            request_id: request.id,
            from_user: PendingSender {
                summary,
                connections_count,
            },
            message: request.message.unwrap_or_default(),
            sent_at: request.sent_at,
        });
    }

    Ok(Json(PendingListResponse {
        total_count: formatted.len(),
        requests: formatted,
    }))
}

/// Query for the connections listing
#[derive(Debug, Deserialize)]
pub struct ConnectionsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: Option<String>,
}

/// An accepted connection
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub connection_id: String,
    #[serde(flatten)]
    pub peer: UserSummary,
    pub connections_count: u64,
    pub connected_at: DateTime<Utc>,
}

/// Connections listing
#[derive(Debug, Serialize)]
pub struct ConnectionsListResponse {
    pub connections: Vec<ConnectionResponse>,
    pub total_count: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// List accepted connections
///
/// GET /api/v1/connections?page=&limit=&search=
///
/// Search filters on the peer's name, role, and location; filtering and
/// pagination happen after the peer resolution.
async fn list_connections(
    user: ActiveUser,
    State(state): State<AppState>,
    Query(query): Query<ConnectionsQuery>,
) -> Result<Json<ConnectionsListResponse>> {
    let accepted = state.db.ledger().list_accepted(&user.id).await?;
    let peers = load_peer_summaries(&state.db, &accepted, &user.id).await?;

    let mut connections = Vec::with_capacity(accepted.len());
    for request in &accepted {
        let peer_id = request.peer_of(&user.id);
        let Some(peer) = peers.get(peer_id).cloned() else {
            continue;
        };
        let connections_count = state.db.users().connection_count(peer_id).await?;

        connections.push(ConnectionResponse {
            connection_id: request.id.clone(),
            peer,
            connections_count,
            connected_at: request.responded_at.unwrap_or(request.sent_at),
        });
    }

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        connections.retain(|conn| {
            conn.peer.name.to_lowercase().contains(&needle)
                || conn.peer.role.as_str().contains(&needle)
                || conn.peer.location.to_lowercase().contains(&needle)
        });
    }

    let total_count = connections.len();
    let start = ((query.page.max(1) - 1) * query.limit) as usize;
    let end = (start + query.limit as usize).min(total_count);
    let page_items: Vec<ConnectionResponse> = connections
        .into_iter()
        .skip(start)
        .take(query.limit as usize)
        .collect();

    Ok(Json(ConnectionsListResponse {
        connections: page_items,
        total_count,
        page: query.page,
        limit: query.limit,
        has_more: end < total_count,
    }))
}

/// Resolve the "other side" of each request into user summaries
async fn load_peer_summaries(
    db: &Database,
    requests: &[ConnectionRequest],
    user_id: &str,
) -> Result<HashMap<String, UserSummary>> {
    let mut peer_ids: Vec<String> = requests
        .iter()
        .map(|r| r.peer_of(user_id).to_string())
        .collect();
    peer_ids.sort();
    peer_ids.dedup();

    let users = db.users().get_many(&peer_ids).await?;

    Ok(users
        .into_iter()
        .map(|u| (u.id.clone(), u.summary()))
        .collect())
}
