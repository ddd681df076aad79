//! Admin dashboard and history endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::dashboard::{DashboardQuery, DashboardRow, HistoryEntry},
};

use super::AdminUser;

/// Tools with their effective status and latest movement
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard rows", body = Vec<DashboardRow>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Query(query), _): WithRejection<Query<DashboardQuery>, AppError>,
) -> AppResult<Json<Vec<DashboardRow>>> {
    let rows = state.services.dashboard.dashboard(&query).await?;
    Ok(Json(rows))
}

/// Most recent check-outs and check-ins
#[utoipa::path(
    get,
    path = "/history",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "History entries, newest first", body = Vec<HistoryEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_history(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = state.services.dashboard.history().await?;
    Ok(Json(entries))
}
