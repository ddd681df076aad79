//! Tool model, effective status and check-out eligibility rules

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Stored tool status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "tool_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    Available,
    InUse,
}

/// Status shown to users: the stored status, unless calibration has lapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveStatus {
    Available,
    InUse,
    InCalibration,
}

impl From<ToolStatus> for EffectiveStatus {
    fn from(status: ToolStatus) -> Self {
        match status {
            ToolStatus::Available => EffectiveStatus::Available,
            ToolStatus::InUse => EffectiveStatus::InUse,
        }
    }
}

/// Effective status of a tool at `now`.
///
/// A calibration tool whose next calibration date is strictly before `now`
/// reads as `InCalibration` whatever its stored status. Every other tool
/// reads as its stored status.
pub fn effective_status(
    status: ToolStatus,
    is_calibration_tool: bool,
    next_calibration_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> EffectiveStatus {
    match next_calibration_date {
        Some(due) if is_calibration_tool && due < now => EffectiveStatus::InCalibration,
        _ => status.into(),
    }
}

/// Tool model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: Uuid,
    pub name: String,
    /// Identifier encoded in the QR label
    pub qr_id: String,
    pub status: ToolStatus,
    pub is_calibration_tool: bool,
    pub next_calibration_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Tool {
    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        effective_status(
            self.status,
            self.is_calibration_tool,
            self.next_calibration_date,
            now,
        )
    }

    /// Check that the tool may be handed out at `now`.
    ///
    /// Calibration is checked before availability, so a lapsed tool that is
    /// also in use reports the calibration problem.
    pub fn ensure_checkout_allowed(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_calibration_tool {
            match self.next_calibration_date {
                Some(due) if due < now => {
                    return Err(AppError::Forbidden(format!(
                        "BLOCKED: calibration of {} expired on {}. It must go to the lab.",
                        self.name,
                        due.format("%Y-%m-%d")
                    )));
                }
                None => {
                    return Err(AppError::Forbidden(format!(
                        "BLOCKED: {} is a calibration tool with no next calibration date assigned. Contact administration.",
                        self.name
                    )));
                }
                Some(_) => {}
            }
        }

        if self.status == ToolStatus::InUse {
            return Err(AppError::Conflict("This tool is already in use".to_string()));
        }

        Ok(())
    }

    /// Check that the tool is out and can be returned
    pub fn ensure_checkin_allowed(&self) -> AppResult<()> {
        if self.status == ToolStatus::Available {
            return Err(AppError::Conflict(
                "This tool is already available in the showroom".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tool with its computed status
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetails {
    #[serde(flatten)]
    pub tool: Tool,
    pub effective_status: EffectiveStatus,
}

/// Create tool request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTool {
    pub name: Option<String>,
    pub qr_id: Option<String>,
    pub is_calibration_tool: Option<bool>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    pub next_calibration_date: Option<String>,
}

/// Validated tool data ready to be stored
#[derive(Debug, Clone)]
pub struct NewTool {
    pub name: String,
    pub qr_id: String,
    pub is_calibration_tool: bool,
    pub next_calibration_date: Option<DateTime<Utc>>,
}

/// Calibration renewal request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewCalibration {
    /// RFC 3339 timestamp or YYYY-MM-DD
    pub next_calibration_date: Option<String>,
}

/// Parse a calibration date given either as a full RFC 3339 timestamp or as a
/// plain calendar date (midnight UTC).
pub fn parse_calibration_date(value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid calibration date: {}", value)))
}
