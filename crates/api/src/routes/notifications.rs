//! Notification routes
//!
//! Create/list/read/delete operations on a user's notification feed. Creates
//! with a repeated dedupe key are acknowledged as deduped, not errors.

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizlink_store::{CreateOutcome, NewNotification, Notification};

use crate::error::{ApiError, Result};
use crate::extract::ActiveUser;
use crate::state::AppState;

/// Notification routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_notification).get(list_notifications).delete(bulk_delete))
        .route("/count", get(unread_count))
        .route("/read-all", put(read_all))
        .route("/{id}/read", put(mark_read))
        .route("/{id}", delete(delete_one))
}

// =============================================================================
// Create
// =============================================================================

/// Create request
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub to_user_id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub dedupe_key: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Create response
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub deduped: bool,
}

/// Create a notification
///
/// POST /api/v1/notifications
///
/// Returns 201 with the new id, or 200 with `deduped: true` when the
/// (recipient, dedupe key) pair already exists.
async fn create_notification(
    _user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<CreateResponse>)> {
    if req.to_user_id.is_empty() || req.kind.is_empty() || req.title.is_empty() || req.body.is_empty()
    {
        return Err(ApiError::bad_request(
            "to_user_id, kind, title and body are required",
        ));
    }

    let input = NewNotification {
        user_id: req.to_user_id,
        kind: req.kind,
        title: req.title,
        body: req.body,
        data: req.data,
        icon: req.icon,
        link: req.link,
        source: req.source,
        dedupe_key: req.dedupe_key,
        expires_at: req.expires_at,
    };

    match state.db.notifications().create(&input).await? {
        CreateOutcome::Created(id) => Ok((
            StatusCode::CREATED,
            Json(CreateResponse {
                id: Some(id),
                deduped: false,
            }),
        )),
        CreateOutcome::Deduped => Ok((
            StatusCode::OK,
            Json(CreateResponse {
                id: None,
                deduped: true,
            }),
        )),
    }
}

// =============================================================================
// List / count
// =============================================================================

/// List query
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub unread_only: bool,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Pagination block
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// List response
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Notification>,
    pub pagination: Pagination,
}

/// List the caller's notifications, newest first
///
/// GET /api/v1/notifications?page=&limit=&unread_only=
async fn list_notifications(
    user: ActiveUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let (data, total) = state
        .db
        .notifications()
        .list(&user.id, query.page, query.limit, query.unread_only)
        .await?;

    let total_pages = total.div_ceil(query.limit.max(1) as u64);

    Ok(Json(ListResponse {
        data,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total,
            total_pages,
        },
    }))
}

/// Unread count response
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

/// Unread notification count
///
/// GET /api/v1/notifications/count
async fn unread_count(
    user: ActiveUser,
    State(state): State<AppState>,
) -> Result<Json<UnreadCountResponse>> {
    let unread = state.db.notifications().unread_count(&user.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

// =============================================================================
// Read
// =============================================================================

/// Mark one notification read
///
/// PUT /api/v1/notifications/{id}/read
async fn mark_read(
    user: ActiveUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let matched = state.db.notifications().mark_read(&id, &user.id).await?;
    if !matched {
        return Err(ApiError::not_found("notification"));
    }
    Ok(StatusCode::OK)
}

/// Read-all request
#[derive(Debug, Default, Deserialize)]
pub struct ReadAllRequest {
    #[serde(default)]
    pub older_than: Option<DateTime<Utc>>,
    #[serde(default)]
    pub kinds: Vec<String>,
}

/// Read-all response
#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub modified: u64,
}

/// Mark all matching notifications read
///
/// PUT /api/v1/notifications/read-all
async fn read_all(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<ReadAllRequest>,
) -> Result<Json<ReadAllResponse>> {
    let modified = state
        .db
        .notifications()
        .mark_all_read(&user.id, req.older_than, &req.kinds)
        .await?;

    Ok(Json(ReadAllResponse { modified }))
}

// =============================================================================
// Delete
// =============================================================================

/// Delete one notification
///
/// DELETE /api/v1/notifications/{id}
async fn delete_one(
    user: ActiveUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let matched = state.db.notifications().delete(&id, &user.id).await?;
    if !matched {
        return Err(ApiError::not_found("notification"));
    }
    Ok(StatusCode::OK)
}

/// Bulk-delete request: explicit ids, or everything up to a cutoff
#[derive(Debug, Default, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub older_than: Option<DateTime<Utc>>,
}

/// Bulk-delete response
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// Delete a batch of the caller's notifications
///
/// DELETE /api/v1/notifications
async fn bulk_delete(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>> {
    let deleted = if !req.ids.is_empty() {
        state.db.notifications().delete_many(&user.id, &req.ids).await?
    } else if let Some(cutoff) = req.older_than {
        state.db.notifications().delete_older_than(&user.id, cutoff).await?
    } else {
        return Err(ApiError::bad_request("provide ids[] or older_than"));
    };

    Ok(Json(BulkDeleteResponse { deleted }))
}
