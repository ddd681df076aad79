//! Movement log model and check-out/check-in request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{tool::Tool, user::User};
use crate::error::{AppError, AppResult};

/// Kind of movement recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "log_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    CheckOut,
    CheckIn,
}

/// Append-only log row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub user_id: Uuid,
    pub tool_id: Uuid,
    /// Client or job name on check-out, showroom label on check-in
    pub client_job_id: Option<String>,
    /// Return remarks, check-in only
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Log row about to be written
#[derive(Debug, Clone)]
pub struct NewLog {
    pub log_type: LogType,
    pub user_id: Uuid,
    pub tool_id: Uuid,
    pub client_job_id: Option<String>,
    pub comments: Option<String>,
}

/// Worker named on the most recent check-out of a tool
#[derive(Debug, Clone, FromRow)]
pub struct CheckoutHolder {
    pub user_id: Uuid,
    pub name: String,
    pub worker_id: String,
}

impl CheckoutHolder {
    /// Only the worker who took the tool out may bring it back
    pub fn ensure_held_by(&self, user: &User) -> AppResult<()> {
        if self.user_id != user.id {
            return Err(AppError::Forbidden(format!(
                "This tool was checked out by {} (ID: {}). Only they can return it.",
                self.name, self.worker_id
            )));
        }
        Ok(())
    }
}

/// Check-out request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub qr_id: Option<String>,
    pub worker_id: Option<String>,
    /// Client or job the tool is going to
    pub client_name: Option<String>,
}

/// Check-in request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
    pub qr_id: Option<String>,
    pub worker_id: Option<String>,
    pub comments: Option<String>,
}

/// Result of a check-out or check-in
#[derive(Debug, Serialize, ToSchema)]
pub struct MovementResponse {
    pub message: String,
    pub tool: Tool,
    pub log: Log,
}
