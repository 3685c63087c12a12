//! Connection request ledger
//!
//! Directed request edges and their lifecycle. Status transitions are single
//! conditional updates keyed on the current status, so two concurrent
//! responders cannot both win.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::models::{ConnectionRequest, RequestAction, RequestStatus};
use crate::users::{parse_datetime, parse_datetime_opt};

/// Store for connection requests
pub struct LedgerStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LedgerStore<'a> {
    /// Create a new ledger store
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Send a connection request
    ///
    /// Rejects self-requests and any pair that already has a live
    /// (pending or accepted) edge in either direction. A stale edge in the
    /// same direction (declined/withdrawn) is revived as a fresh pending
    /// request, so a retry after a decline is allowed.
    pub async fn create(
        &self,
        from_user: &str,
        to_user: &str,
        message: Option<String>,
    ) -> Result<ConnectionRequest> {
        if from_user == to_user {
            return Err(StoreError::invalid(
                "to_user",
                "cannot send a connection request to yourself",
            ));
        }

        let existing = self.between(from_user, to_user).await?;

        if let Some(live) = existing.iter().find(|r| r.status.is_live()) {
            return Err(StoreError::conflict(format!(
                "a {} request already exists between these users",
                live.status
            )));
        }

        let now = Utc::now();

        if let Some(stale) = existing.iter().find(|r| r.from_user == from_user) {
            // Revive the old row; UNIQUE(from_user, to_user) holds one row
            // per direction.
            sqlx::query(
                r#"
                UPDATE connection_requests
                SET status = 'pending', message = ?, sent_at = ?, responded_at = NULL
                WHERE id = ?
                "#,
            )
            .bind(&message)
            .bind(now.to_rfc3339())
            .bind(&stale.id)
            .execute(self.pool)
            .await?;

            info!(request_id = %stale.id, from_user, to_user, "Connection request re-sent");

            return self
                .get_by_id(&stale.id)
                .await?
                .ok_or_else(|| StoreError::not_found("connection request"));
        }

        let request = ConnectionRequest::new(from_user, to_user, message);

        sqlx::query(
            r#"
            INSERT INTO connection_requests (id, from_user, to_user, status, message, sent_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.from_user)
        .bind(&request.to_user)
        .bind(request.status.as_str())
        .bind(&request.message)
        .bind(request.sent_at.to_rfc3339())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                StoreError::conflict("a request already exists between these users")
            } else {
                StoreError::from(e)
            }
        })?;

        info!(request_id = %request.id, from_user, to_user, "Connection request sent");

        Ok(request)
    }

    /// Get a request by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ConnectionRequest>> {
        let row = sqlx::query("SELECT * FROM connection_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_request).transpose()
    }

    /// Accept or decline a pending request
    ///
    /// Only the recipient may respond, and only while the request is pending.
    /// The transition is one conditional update; losing a race surfaces as
    /// Conflict. On accept, both users' connection caches are updated after
    /// the authoritative status write.
    pub async fn respond(
        &self,
        request_id: &str,
        acting_user: &str,
        action: RequestAction,
    ) -> Result<ConnectionRequest> {
        let request = self
            .get_by_id(request_id)
            .await?
            .ok_or_else(|| StoreError::not_found("connection request"))?;

        if request.to_user != acting_user {
            return Err(StoreError::forbidden(
                "only the recipient may respond to this request",
            ));
        }

        let new_status = action.target_status();
        let responded_at = Utc::now();

        let result = sqlx::query(
            "UPDATE connection_requests SET status = ?, responded_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(new_status.as_str())
        .bind(responded_at.to_rfc3339())
        .bind(request_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict(
                "request has already been responded to",
            ));
        }

        if new_status == RequestStatus::Accepted {
            crate::users::UserStore::new(self.pool)
                .add_connection(&request.from_user, &request.to_user)
                .await?;
        }

        info!(request_id, status = %new_status, "Connection request responded");

        self.get_by_id(request_id)
            .await?
            .ok_or_else(|| StoreError::not_found("connection request"))
    }

    /// Withdraw a pending request
    ///
    /// Only the sender may withdraw, and only while the request is pending.
    pub async fn withdraw(&self, request_id: &str, acting_user: &str) -> Result<ConnectionRequest> {
        let request = self
            .get_by_id(request_id)
            .await?
            .ok_or_else(|| StoreError::not_found("connection request"))?;

        if request.from_user != acting_user {
            return Err(StoreError::forbidden(
                "only the sender may withdraw this request",
            ));
        }

        let result = sqlx::query(
            "UPDATE connection_requests SET status = 'withdrawn', responded_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(request_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict(
                "cannot withdraw a request that has already been responded to",
            ));
        }

        info!(request_id, "Connection request withdrawn");

        self.get_by_id(request_id)
            .await?
            .ok_or_else(|| StoreError::not_found("connection request"))
    }

    /// Requests sent by a user, newest first, with the total count
    pub async fn list_sent(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<ConnectionRequest>, u64)> {
        let offset = (page.max(1) - 1) * limit;

        let rows = sqlx::query(
            "SELECT * FROM connection_requests WHERE from_user = ? ORDER BY sent_at DESC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(self.pool)
        .await?;

        let requests = rows.iter().map(row_to_request).collect::<Result<Vec<_>>>()?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM connection_requests WHERE from_user = ?")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok((requests, total as u64))
    }

    /// Pending requests received by a user, newest first
    pub async fn list_pending_received(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ConnectionRequest>> {
        let rows = sqlx::query(
            "SELECT * FROM connection_requests WHERE to_user = ? AND status = 'pending' ORDER BY sent_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    /// Accepted requests involving a user, most recently responded first
    pub async fn list_accepted(&self, user_id: &str) -> Result<Vec<ConnectionRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM connection_requests
            WHERE status = 'accepted' AND (from_user = ? OR to_user = ?)
            ORDER BY responded_at DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    /// Every other user that shares a request edge with this user, any status
    ///
    /// This is the suggestion exclusion set (minus the user themself).
    pub async fn involved_user_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT from_user, to_user FROM connection_requests WHERE from_user = ? OR to_user = ?",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut ids: Vec<String> = rows
            .iter()
            .map(|row| {
                let from: String = row.get("from_user");
                if from == user_id {
                    row.get("to_user")
                } else {
                    from
                }
            })
            .collect();
        ids.sort();
        ids.dedup();

        Ok(ids)
    }

    /// Count of requests sent by a user
    pub async fn count_sent(&self, user_id: &str) -> Result<u64> {
        self.scalar_count(
            "SELECT COUNT(*) FROM connection_requests WHERE from_user = ?",
            user_id,
        )
        .await
    }

    /// Count of requests received by a user
    pub async fn count_received(&self, user_id: &str) -> Result<u64> {
        self.scalar_count(
            "SELECT COUNT(*) FROM connection_requests WHERE to_user = ?",
            user_id,
        )
        .await
    }

    /// Count of pending requests received by a user
    pub async fn count_pending_received(&self, user_id: &str) -> Result<u64> {
        self.scalar_count(
            "SELECT COUNT(*) FROM connection_requests WHERE to_user = ? AND status = 'pending'",
            user_id,
        )
        .await
    }

    /// Count of requests a user sent since a point in time
    pub async fn count_sent_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM connection_requests WHERE from_user = ? AND sent_at >= ?",
        )
        .bind(user_id)
        .bind(since.to_rfc3339())
        .fetch_one(self.pool)
        .await?;
        Ok(count as u64)
    }

    /// Both rows (at most one per direction) between a pair of users
    async fn between(&self, user_a: &str, user_b: &str) -> Result<Vec<ConnectionRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM connection_requests
            WHERE (from_user = ? AND to_user = ?) OR (from_user = ? AND to_user = ?)
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    async fn scalar_count(&self, sql: &str, user_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(sql)
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Convert a database row to a ConnectionRequest
fn row_to_request(row: &SqliteRow) -> Result<ConnectionRequest> {
    let status_str: String = row.get("status");

    Ok(ConnectionRequest {
        id: row.get("id"),
        from_user: row.get("from_user"),
        to_user: row.get("to_user"),
        status: RequestStatus::parse(&status_str).unwrap_or(RequestStatus::Pending),
        message: row.get("message"),
        sent_at: parse_datetime(row.get("sent_at")),
        responded_at: parse_datetime_opt(row.get("responded_at")),
    })
}
