//! Business logic services

pub mod dashboard;
pub mod tools;
pub mod tracking;
pub mod users;

use crate::{
    config::{AuthConfig, TrackingConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub tools: tools::ToolsService,
    pub tracking: tracking::TrackingService,
    pub dashboard: dashboard::DashboardService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, tracking_config: TrackingConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            tools: tools::ToolsService::new(repository.clone()),
            tracking: tracking::TrackingService::new(repository.clone(), tracking_config.clone()),
            dashboard: dashboard::DashboardService::new(repository.clone(), tracking_config),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping_database(&self) -> Result<(), sqlx::Error> {
        self.repository.ping().await
    }
}
