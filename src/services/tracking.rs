//! Check-out and check-in workflows

use chrono::Utc;

use crate::{
    config::TrackingConfig,
    error::{AppError, AppResult},
    models::{
        log::{CheckinRequest, CheckoutRequest, Log, LogType, NewLog},
        optional, required,
        tool::{Tool, ToolStatus},
        user::User,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TrackingService {
    repository: Repository,
    config: TrackingConfig,
}

impl TrackingService {
    pub fn new(repository: Repository, config: TrackingConfig) -> Self {
        Self { repository, config }
    }

    /// Hand a tool out to a worker for a client or job.
    ///
    /// Fails with not found for an unknown worker or tool, forbidden when a
    /// calibration tool has lapsed or has no calibration date, and conflict
    /// when the tool is already out.
    pub async fn check_out(&self, request: CheckoutRequest) -> AppResult<(Tool, Log)> {
        let qr_id = required(request.qr_id, "qrId")?;
        let worker_id = required(request.worker_id, "workerId")?;
        let client_name = optional(request.client_name);

        let user = self.find_worker(&worker_id).await?;
        let tool = self.find_tool(&qr_id).await?;

        tool.ensure_checkout_allowed(Utc::now()).map_err(|e| {
            tracing::warn!(qr_id = %tool.qr_id, worker_id = %user.worker_id, "Check-out refused: {}", e);
            e
        })?;

        let entry = NewLog {
            log_type: LogType::CheckOut,
            user_id: user.id,
            tool_id: tool.id,
            client_job_id: client_name,
            comments: None,
        };

        let (tool, log) = self
            .repository
            .tools
            .transition(ToolStatus::Available, ToolStatus::InUse, &entry)
            .await?;

        tracing::info!(
            qr_id = %tool.qr_id,
            worker_id = %user.worker_id,
            client = log.client_job_id.as_deref().unwrap_or(""),
            "Tool checked out"
        );

        Ok((tool, log))
    }

    /// Bring a tool back to the showroom.
    ///
    /// Only the worker named on the latest check-out may return it.
    pub async fn check_in(&self, request: CheckinRequest) -> AppResult<(Tool, Log)> {
        let qr_id = required(request.qr_id, "qrId")?;
        let worker_id = required(request.worker_id, "workerId")?;
        let comments = optional(request.comments);

        let user = self.find_worker(&worker_id).await?;
        let tool = self.find_tool(&qr_id).await?;

        tool.ensure_checkin_allowed()?;

        if let Some(holder) = self.repository.logs.latest_checkout_for_tool(tool.id).await? {
            holder.ensure_held_by(&user).map_err(|e| {
                tracing::warn!(qr_id = %tool.qr_id, worker_id = %user.worker_id, holder = %holder.worker_id, "Check-in refused: not the holder");
                e
            })?;
        }

        let entry = NewLog {
            log_type: LogType::CheckIn,
            user_id: user.id,
            tool_id: tool.id,
            client_job_id: Some(self.config.showroom_label.clone()),
            comments,
        };

        let (tool, log) = self
            .repository
            .tools
            .transition(ToolStatus::InUse, ToolStatus::Available, &entry)
            .await?;

        tracing::info!(qr_id = %tool.qr_id, worker_id = %user.worker_id, "Tool checked in");

        Ok((tool, log))
    }

    async fn find_worker(&self, worker_id: &str) -> AppResult<User> {
        self.repository
            .users
            .get_by_worker_id(worker_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Worker ID {} not found", worker_id)))
    }

    async fn find_tool(&self, qr_id: &str) -> AppResult<Tool> {
        self.repository
            .tools
            .get_by_qr_id(qr_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", qr_id)))
    }
}
