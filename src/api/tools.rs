//! Tool inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::tool::{CreateTool, RenewCalibration, Tool, ToolDetails},
};

use super::AdminUser;

/// Register a new tool
#[utoipa::path(
    post,
    path = "/tools",
    tag = "tools",
    security(("bearer_auth" = [])),
    request_body = CreateTool,
    responses(
        (status = 201, description = "Tool created", body = Tool),
        (status = 400, description = "Missing name or QR id, or invalid date"),
        (status = 409, description = "QR id already assigned")
    )
)]
pub async fn create_tool(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Json(request), _): WithRejection<Json<CreateTool>, AppError>,
) -> AppResult<(StatusCode, Json<Tool>)> {
    let tool = state.services.tools.create_tool(request).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}

/// Get a tool with its effective status
#[utoipa::path(
    get,
    path = "/tools/{id}",
    tag = "tools",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Tool details", body = ToolDetails),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn get_tool(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<ToolDetails>> {
    let tool = state.services.tools.get_tool(id).await?;
    Ok(Json(tool))
}

/// Renew a tool's calibration date
#[utoipa::path(
    patch,
    path = "/tools/{id}",
    tag = "tools",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tool ID")),
    request_body = RenewCalibration,
    responses(
        (status = 200, description = "Calibration date updated", body = Tool),
        (status = 400, description = "Missing or invalid date"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn renew_calibration(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<RenewCalibration>, AppError>,
) -> AppResult<Json<Tool>> {
    let tool = state.services.tools.renew_calibration(id, request).await?;
    Ok(Json(tool))
}
