//! Read-only views for the admin dashboard and movement history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{
    log::LogType,
    tool::{effective_status, EffectiveStatus, ToolStatus},
};

/// Placeholder shown when a column has no value
pub const EMPTY_CELL: &str = "---";

/// Shown as the holder of a tool waiting for calibration
pub const NEEDS_CALIBRATION: &str = "Requires calibration";

/// Tool joined with its most recent log entry (any type)
#[derive(Debug, Clone, FromRow)]
pub struct ToolLatestLogRow {
    pub id: Uuid,
    pub name: String,
    pub qr_id: String,
    pub status: ToolStatus,
    pub is_calibration_tool: bool,
    pub next_calibration_date: Option<DateTime<Utc>>,
    pub last_client_job_id: Option<String>,
    pub last_log_at: Option<DateTime<Utc>>,
    pub last_user_name: Option<String>,
}

/// One dashboard line: where each tool is and who has it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub id: Uuid,
    pub name: String,
    pub qr_id: String,
    pub status: ToolStatus,
    pub effective_status: EffectiveStatus,
    pub is_calibration_tool: bool,
    pub next_calibration_date: Option<DateTime<Utc>>,
    /// Time of the latest movement
    pub timestamp: Option<DateTime<Utc>>,
    pub who: String,
    #[serde(rename = "where")]
    pub location: String,
}

impl DashboardRow {
    /// Build the dashboard line for a tool as seen at `now`
    pub fn project(row: ToolLatestLogRow, now: DateTime<Utc>, showroom: &str) -> Self {
        let effective = effective_status(
            row.status,
            row.is_calibration_tool,
            row.next_calibration_date,
            now,
        );

        let last_user = row.last_user_name.unwrap_or_else(|| EMPTY_CELL.to_string());

        let (who, location) = match row.status {
            ToolStatus::InUse => (
                last_user,
                row.last_client_job_id.unwrap_or_else(|| EMPTY_CELL.to_string()),
            ),
            ToolStatus::Available if effective == EffectiveStatus::InCalibration => {
                (NEEDS_CALIBRATION.to_string(), showroom.to_string())
            }
            ToolStatus::Available => (last_user, showroom.to_string()),
        };

        Self {
            id: row.id,
            name: row.name,
            qr_id: row.qr_id,
            status: row.status,
            effective_status: effective,
            is_calibration_tool: row.is_calibration_tool,
            next_calibration_date: row.next_calibration_date,
            timestamp: row.last_log_at,
            who,
            location,
        }
    }
}

/// Dashboard filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DashboardQuery {
    /// Case-insensitive match on tool name or QR id
    pub search: Option<String>,
    /// Only tools currently showing this effective status
    pub status: Option<EffectiveStatus>,
}

impl DashboardQuery {
    pub fn matches_status(&self, row: &DashboardRow) -> bool {
        self.status.map_or(true, |s| s == row.effective_status)
    }
}

/// Log row joined with tool and user names
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub log_type: LogType,
    pub client_job_id: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tool_name: String,
    pub tool_qr_id: String,
    pub user_name: String,
    pub user_worker_id: String,
}

/// One history line
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub tool_name: String,
    pub tool_qr_id: String,
    pub action: LogType,
    pub user_name: String,
    pub user_worker_id: String,
    pub client_name: String,
    pub comments: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            tool_name: row.tool_name,
            tool_qr_id: row.tool_qr_id,
            action: row.log_type,
            user_name: row.user_name,
            user_worker_id: row.user_worker_id,
            client_name: row.client_job_id.unwrap_or_else(|| EMPTY_CELL.to_string()),
            comments: row.comments,
            timestamp: row.created_at,
        }
    }
}
