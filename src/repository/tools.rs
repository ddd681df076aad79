//! Tools repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        dashboard::ToolLatestLogRow,
        log::{Log, NewLog},
        tool::{NewTool, Tool, ToolStatus},
    },
};

#[derive(Clone)]
pub struct ToolsRepository {
    pool: Pool<Postgres>,
}

impl ToolsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get tool by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Tool> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool with id {} not found", id)))
    }

    /// Get tool by the identifier printed on its QR label
    pub async fn get_by_qr_id(&self, qr_id: &str) -> AppResult<Option<Tool>> {
        let tool = sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE qr_id = $1")
            .bind(qr_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tool)
    }

    /// Check if a QR id is already assigned
    pub async fn qr_id_exists(&self, qr_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tools WHERE qr_id = $1)")
            .bind(qr_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Create a new tool, initially available
    pub async fn create(&self, tool: &NewTool) -> AppResult<Tool> {
        let created = sqlx::query_as::<_, Tool>(
            r#"
            INSERT INTO tools (id, name, qr_id, status, is_calibration_tool, next_calibration_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&tool.name)
        .bind(&tool.qr_id)
        .bind(ToolStatus::Available)
        .bind(tool.is_calibration_tool)
        .bind(tool.next_calibration_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Set the next calibration date; nothing else on the row changes
    pub async fn update_calibration_date(&self, id: Uuid, date: DateTime<Utc>) -> AppResult<Tool> {
        sqlx::query_as::<_, Tool>(
            "UPDATE tools SET next_calibration_date = $1 WHERE id = $2 RETURNING *",
        )
        .bind(date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tool with id {} not found", id)))
    }

    /// All tools by name, each with its most recent log entry.
    ///
    /// `search` filters on name or QR id, case-insensitively.
    pub async fn list_with_latest_log(&self, search: Option<&str>) -> AppResult<Vec<ToolLatestLogRow>> {
        let rows = sqlx::query_as::<_, ToolLatestLogRow>(
            r#"
            SELECT t.id, t.name, t.qr_id, t.status, t.is_calibration_tool, t.next_calibration_date,
                   l.client_job_id AS last_client_job_id,
                   l.created_at AS last_log_at,
                   u.name AS last_user_name
            FROM tools t
            LEFT JOIN LATERAL (
                SELECT lg.user_id, lg.client_job_id, lg.created_at
                FROM logs lg
                WHERE lg.tool_id = t.id
                ORDER BY lg.created_at DESC
                LIMIT 1
            ) l ON TRUE
            LEFT JOIN users u ON u.id = l.user_id
            WHERE $1::text IS NULL
               OR t.name ILIKE $1 ESCAPE '\'
               OR t.qr_id ILIKE $1 ESCAPE '\'
            ORDER BY t.name
            "#,
        )
        .bind(search.map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Move a tool from `from` to `to` and append the matching log entry, in
    /// one transaction.
    ///
    /// The status update only applies while the row still holds `from`; if
    /// another request changed it first, nothing is written and the call
    /// fails with a conflict.
    pub async fn transition(
        &self,
        from: ToolStatus,
        to: ToolStatus,
        entry: &NewLog,
    ) -> AppResult<(Tool, Log)> {
        let mut tx = self.pool.begin().await?;

        let tool = sqlx::query_as::<_, Tool>(
            "UPDATE tools SET status = $1 WHERE id = $2 AND status = $3 RETURNING *",
        )
        .bind(to)
        .bind(entry.tool_id)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(tool) = tool else {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                "Tool status changed while processing the request, try again".to_string(),
            ));
        };

        let log = sqlx::query_as::<_, Log>(
            r#"
            INSERT INTO logs (id, type, user_id, tool_id, client_job_id, comments)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.log_type)
        .bind(entry.user_id)
        .bind(entry.tool_id)
        .bind(&entry.client_job_id)
        .bind(&entry.comments)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((tool, log))
    }
}

/// `ILIKE` pattern matching `search` anywhere, with its wildcards taken literally
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
