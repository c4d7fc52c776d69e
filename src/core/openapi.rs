use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::dashboard::handlers as dashboard_handlers;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::types::{ActionResponse, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::get_me,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        reports_handlers::update_report_category,
        reports_handlers::delete_report,
        // Dashboard
        dashboard_handlers::get_stats,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            ActionResponse,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::MeResponseDto,
            auth::model::Role,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportCategory,
            reports_models::ReportStats,
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportMultipart,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::UpdateReportCategoryDto,
            reports_dtos::DeleteReportDto,
        )
    ),
    tags(
        (name = "auth", description = "Registration and session identity"),
        (name = "reports", description = "Citizen reports and their review workflow"),
        (name = "Dashboard", description = "Report statistics (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Civic Reports API",
        version = "0.1.0",
        description = "API documentation for Civic Reports",
    )
)]
pub struct ApiDoc;

/// Documents the session cookie set by the login form
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct DocsInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for DocsInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
