//! Tool inventory service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        optional, required,
        tool::{parse_calibration_date, CreateTool, NewTool, RenewCalibration, Tool, ToolDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ToolsService {
    repository: Repository,
}

impl ToolsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a tool with its effective status
    pub async fn get_tool(&self, id: Uuid) -> AppResult<ToolDetails> {
        let tool = self.repository.tools.get_by_id(id).await?;
        Ok(ToolDetails {
            effective_status: tool.effective_status(Utc::now()),
            tool,
        })
    }

    /// Register a new tool; it starts available
    pub async fn create_tool(&self, request: CreateTool) -> AppResult<Tool> {
        let tool = prepare_tool(request)?;

        if self.repository.tools.qr_id_exists(&tool.qr_id).await? {
            return Err(AppError::Conflict(format!(
                "A tool with QR ID {} already exists",
                tool.qr_id
            )));
        }

        let created = self.repository.tools.create(&tool).await?;
        tracing::info!(tool_id = %created.id, qr_id = %created.qr_id, "Tool created");
        Ok(created)
    }

    /// Set a new calibration date. The stored status is left alone; a tool
    /// shown as in calibration reads as its stored status again once the
    /// date is in the future.
    pub async fn renew_calibration(&self, id: Uuid, request: RenewCalibration) -> AppResult<Tool> {
        let raw = optional(request.next_calibration_date)
            .ok_or_else(|| AppError::Validation("A new calibration date is required".to_string()))?;
        let date = parse_calibration_date(&raw)?;

        let tool = self.repository.tools.update_calibration_date(id, date).await?;
        tracing::info!(tool_id = %tool.id, next_calibration_date = %date, "Calibration renewed");
        Ok(tool)
    }
}

fn prepare_tool(request: CreateTool) -> AppResult<NewTool> {
    let name = required(request.name, "name")?;
    let qr_id = required(request.qr_id, "qrId")?;
    let next_calibration_date = optional(request.next_calibration_date)
        .map(|d| parse_calibration_date(&d))
        .transpose()?;

    Ok(NewTool {
        name,
        qr_id,
        is_calibration_tool: request.is_calibration_tool.unwrap_or(false),
        next_calibration_date,
    })
}
