//! Tooltrack tool tracking server
//!
//! Workers scan a tool's QR label and identify themselves by worker ID to
//! check the tool out to a client or job, or back into the showroom.
//! Administrators manage tools and users and watch the dashboard and history
//! through a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
