//! Notification sink store
//!
//! Per-user delivery records. Creation is idempotent per (user, dedupe key):
//! a repeated key is a no-op success, not an error.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::{CreateOutcome, NewNotification, Notification};
use crate::users::{parse_datetime, parse_datetime_opt};

/// Store for notifications
pub struct NotificationStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NotificationStore<'a> {
    /// Create a new notification store
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a notification
    ///
    /// When `dedupe_key` is present and a record with the same
    /// (user, dedupe key) already exists, returns [`CreateOutcome::Deduped`]
    /// without writing.
    pub async fn create(&self, input: &NewNotification) -> Result<CreateOutcome> {
        let id = uuid::Uuid::new_v4().to_string();
        let data_json = input
            .data
            .as_ref()
            .map(|v| serde_json::to_string(v))
            .transpose()
            .map_err(|e| StoreError::Database(format!("failed to encode data: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, data, icon, link,
                                       source, dedupe_key, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.user_id)
        .bind(&input.kind)
        .bind(&input.title)
        .bind(&input.body)
        .bind(&data_json)
        .bind(&input.icon)
        .bind(&input.link)
        .bind(&input.source)
        .bind(&input.dedupe_key)
        .bind(input.expires_at.map(|t| t.to_rfc3339()))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool)
        .await;

        match result {
            Ok(_) => Ok(CreateOutcome::Created(id)),
            Err(e) if e.to_string().contains("UNIQUE constraint") => {
                debug!(user_id = %input.user_id, dedupe_key = ?input.dedupe_key, "Duplicate notification ignored");
                Ok(CreateOutcome::Deduped)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's notifications, newest first, with the total count
    pub async fn list(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
        unread_only: bool,
    ) -> Result<(Vec<Notification>, u64)> {
        let offset = (page.max(1) - 1) * limit;

        let unread_clause = if unread_only { " AND is_read = 0" } else { "" };

        let rows = sqlx::query(&format!(
            "SELECT * FROM notifications WHERE user_id = ?{} ORDER BY created_at DESC, id LIMIT ? OFFSET ?",
            unread_clause
        ))
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(self.pool)
        .await?;

        let items = rows.iter().map(row_to_notification).collect::<Result<Vec<_>>>()?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?{}",
            unread_clause
        ))
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok((items, total as u64))
    }

    /// Number of unread notifications for a user
    pub async fn unread_count(&self, user_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count as u64)
    }

    /// Mark one notification read; false when no row matched
    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all matching unread notifications read; returns the count
    ///
    /// Optional filters: only records created at or before `older_than`, only
    /// the given kinds.
    pub async fn mark_all_read(
        &self,
        user_id: &str,
        older_than: Option<DateTime<Utc>>,
        kinds: &[String],
    ) -> Result<u64> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE notifications SET is_read = 1 WHERE is_read = 0 AND user_id = ");
        qb.push_bind(user_id);

        if let Some(cutoff) = older_than {
            qb.push(" AND created_at <= ");
            qb.push_bind(cutoff.to_rfc3339());
        }
        if !kinds.is_empty() {
            qb.push(" AND kind IN (");
            {
                let mut separated = qb.separated(", ");
                for kind in kinds {
                    separated.push_bind(kind.clone());
                }
            }
            qb.push(")");
        }

        let result = qb.build().execute(self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete one notification; false when no row matched
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a set of a user's notifications by id; returns the count
    pub async fn delete_many(&self, user_id: &str, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM notifications WHERE user_id = ");
        qb.push_bind(user_id);
        qb.push(" AND id IN (");
        {
            let mut separated = qb.separated(", ");
            for id in ids {
                separated.push_bind(id.clone());
            }
        }
        qb.push(")");

        let result = qb.build().execute(self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete a user's notifications created at or before `cutoff`
    pub async fn delete_older_than(&self, user_id: &str, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE user_id = ? AND created_at <= ?",
        )
        .bind(user_id)
        .bind(cutoff.to_rfc3339())
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Convert a database row to a Notification
fn row_to_notification(row: &SqliteRow) -> Result<Notification> {
    let data_json: Option<String> = row.get("data");
    let data = data_json
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| StoreError::Database(format!("corrupt notification data: {}", e)))?;

    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: row.get("kind"),
        title: row.get("title"),
        body: row.get("body"),
        data,
        icon: row.get("icon"),
        link: row.get("link"),
        source: row.get("source"),
        dedupe_key: row.get("dedupe_key"),
        is_read: row.get("is_read"),
        expires_at: parse_datetime_opt(row.get("expires_at")),
        created_at: parse_datetime(row.get("created_at")),
    })
}
