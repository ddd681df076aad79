//! Movement log queries

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        dashboard::HistoryRow,
        log::{CheckoutHolder, LogType},
    },
};

#[derive(Clone)]
pub struct LogsRepository {
    pool: Pool<Postgres>,
}

impl LogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Worker on the most recent check-out of a tool, if it was ever checked out
    pub async fn latest_checkout_for_tool(&self, tool_id: Uuid) -> AppResult<Option<CheckoutHolder>> {
        let holder = sqlx::query_as::<_, CheckoutHolder>(
            r#"
            SELECT u.id AS user_id, u.name, u.worker_id
            FROM logs l
            JOIN users u ON u.id = l.user_id
            WHERE l.tool_id = $1 AND l.type = $2
            ORDER BY l.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(tool_id)
        .bind(LogType::CheckOut)
        .fetch_optional(&self.pool)
        .await?;

        Ok(holder)
    }

    /// Most recent log rows across all tools, newest first
    pub async fn recent_history(&self, limit: u32) -> AppResult<Vec<HistoryRow>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT l.id, l.type, l.client_job_id, l.comments, l.created_at,
                   t.name AS tool_name, t.qr_id AS tool_qr_id,
                   u.name AS user_name, u.worker_id AS user_worker_id
            FROM logs l
            JOIN tools t ON t.id = l.tool_id
            JOIN users u ON u.id = l.user_id
            ORDER BY l.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
