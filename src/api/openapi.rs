//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, dashboard, health, tools, tracking, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tooltrack API",
        version = "1.0.0",
        description = "Tool check-out/check-in tracking REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Tools
        tools::create_tool,
        tools::get_tool,
        tools::renew_calibration,
        // Users
        users::list_users,
        users::create_user,
        // Tracking
        tracking::checkout,
        tracking::checkin,
        // Dashboard
        dashboard::get_dashboard,
        dashboard::get_history,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Tools
            crate::models::tool::Tool,
            crate::models::tool::ToolDetails,
            crate::models::tool::ToolStatus,
            crate::models::tool::EffectiveStatus,
            crate::models::tool::CreateTool,
            crate::models::tool::RenewCalibration,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::CreateUser,
            // Tracking
            crate::models::log::Log,
            crate::models::log::LogType,
            crate::models::log::CheckoutRequest,
            crate::models::log::CheckinRequest,
            crate::models::log::MovementResponse,
            // Dashboard
            crate::models::dashboard::DashboardRow,
            crate::models::dashboard::DashboardQuery,
            crate::models::dashboard::HistoryEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Administrator sign-in"),
        (name = "tools", description = "Tool inventory and calibration"),
        (name = "users", description = "User management"),
        (name = "tracking", description = "Check-out and check-in"),
        (name = "dashboard", description = "Dashboard and history")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by admin endpoints
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_tracking_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/checkout", "/checkin", "/tools", "/tools/{id}", "/dashboard", "/history", "/users"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
