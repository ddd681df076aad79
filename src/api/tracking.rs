//! Kiosk endpoints: check a tool out or back in by scanning its QR label

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::log::{CheckinRequest, CheckoutRequest, MovementResponse},
};

/// Check a tool out to a worker
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "tracking",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Tool checked out", body = MovementResponse),
        (status = 400, description = "Missing QR id or worker ID"),
        (status = 403, description = "Calibration expired or not assigned"),
        (status = 404, description = "Worker or tool not found"),
        (status = 409, description = "Tool already in use")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CheckoutRequest>, AppError>,
) -> AppResult<Json<MovementResponse>> {
    let (tool, log) = state.services.tracking.check_out(request).await?;

    Ok(Json(MovementResponse {
        message: "Check-out successful".to_string(),
        tool,
        log,
    }))
}

/// Return a tool to the showroom
#[utoipa::path(
    post,
    path = "/checkin",
    tag = "tracking",
    request_body = CheckinRequest,
    responses(
        (status = 200, description = "Tool checked in", body = MovementResponse),
        (status = 400, description = "Missing QR id or worker ID"),
        (status = 403, description = "Tool is held by another worker"),
        (status = 404, description = "Worker or tool not found"),
        (status = 409, description = "Tool already available")
    )
)]
pub async fn checkin(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CheckinRequest>, AppError>,
) -> AppResult<Json<MovementResponse>> {
    let (tool, log) = state.services.tracking.check_in(request).await?;

    Ok(Json(MovementResponse {
        message: "Check-in successful".to_string(),
        tool,
        log,
    }))
}
