//! Profile-view log store
//!
//! One rolling row per (viewer, viewed) pair: repeat views bump the counter
//! and refresh the timestamp instead of inserting new rows.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::error::Result;
use crate::models::{ViewLog, ViewSource};
use crate::users::parse_datetime;

/// Store for profile views
pub struct ViewStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ViewStore<'a> {
    /// Create a new view store
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a view, upserting the rolling row for this pair
    pub async fn record_view(
        &self,
        viewer: &str,
        viewed_user: &str,
        source: ViewSource,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO view_logs (viewer, viewed_user, source, viewed_at, view_count)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT (viewer, viewed_user) DO UPDATE SET
                view_count = view_count + 1,
                viewed_at = excluded.viewed_at,
                source = excluded.source
            "#,
        )
        .bind(viewer)
        .bind(viewed_user)
        .bind(source.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Most recent viewers of a user, newest first
    ///
    /// Rows are already unique per viewer.
    pub async fn recent_viewers(&self, viewed_user: &str, limit: u32) -> Result<Vec<ViewLog>> {
        let rows = sqlx::query(
            "SELECT * FROM view_logs WHERE viewed_user = ? ORDER BY viewed_at DESC LIMIT ?",
        )
        .bind(viewed_user)
        .bind(limit as i64)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_view).collect()
    }

    /// The stored row for one viewer/viewed pair
    pub async fn get(&self, viewer: &str, viewed_user: &str) -> Result<Option<ViewLog>> {
        let row = sqlx::query("SELECT * FROM view_logs WHERE viewer = ? AND viewed_user = ?")
            .bind(viewer)
            .bind(viewed_user)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_view).transpose()
    }

    /// All-time view count for a user (sum of per-viewer counters)
    pub async fn total_views(&self, viewed_user: &str) -> Result<u64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(view_count) FROM view_logs WHERE viewed_user = ?",
        )
        .bind(viewed_user)
        .fetch_one(self.pool)
        .await?;
        Ok(total.unwrap_or(0) as u64)
    }

    /// Distinct viewers whose latest view was at or after `since`
    pub async fn views_since(&self, viewed_user: &str, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM view_logs WHERE viewed_user = ? AND viewed_at >= ?",
        )
        .bind(viewed_user)
        .bind(since.to_rfc3339())
        .fetch_one(self.pool)
        .await?;
        Ok(count as u64)
    }

    /// Distinct viewers whose latest view fell in `[start, end)`
    pub async fn views_between(
        &self,
        viewed_user: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM view_logs WHERE viewed_user = ? AND viewed_at >= ? AND viewed_at < ?",
        )
        .bind(viewed_user)
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_one(self.pool)
        .await?;
        Ok(count as u64)
    }
}

/// Convert a database row to a ViewLog
fn row_to_view(row: &SqliteRow) -> Result<ViewLog> {
    let source_str: String = row.get("source");

    Ok(ViewLog {
        viewer: row.get("viewer"),
        viewed_user: row.get("viewed_user"),
        source: ViewSource::parse(&source_str).unwrap_or_default(),
        viewed_at: parse_datetime(row.get("viewed_at")),
        view_count: row.get("view_count"),
    })
}
