//! Dashboard and history views

use chrono::Utc;

use crate::{
    config::TrackingConfig,
    error::AppResult,
    models::{
        dashboard::{DashboardQuery, DashboardRow, HistoryEntry},
        optional,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
    config: TrackingConfig,
}

impl DashboardService {
    pub fn new(repository: Repository, config: TrackingConfig) -> Self {
        Self { repository, config }
    }

    /// Every tool with its effective status and latest movement
    pub async fn dashboard(&self, query: &DashboardQuery) -> AppResult<Vec<DashboardRow>> {
        let search = optional(query.search.clone());
        let rows = self
            .repository
            .tools
            .list_with_latest_log(search.as_deref())
            .await?;

        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|row| DashboardRow::project(row, now, &self.config.showroom_label))
            .filter(|row| query.matches_status(row))
            .collect())
    }

    /// Most recent movements across all tools
    pub async fn history(&self) -> AppResult<Vec<HistoryEntry>> {
        let rows = self
            .repository
            .logs
            .recent_history(self.config.history_limit)
            .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }
}
