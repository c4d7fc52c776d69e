use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::model::RequestContext;
use crate::features::auth::policy::Action;
use crate::features::reports::models::ReportStats;
use crate::features::reports::ReportService;
use crate::shared::types::ErrorResponse;

// ============================================================================
// Statistics
// ============================================================================

/// Count reports per status (admin only)
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Report counts per status", body = ReportStats),
        (status = 303, description = "Not logged in, redirected to /login"),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn get_stats(
    ctx: RequestContext,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ReportStats>, AppError> {
    ctx.authorize(Action::ViewStats)?;
    let stats = service.aggregate_counts().await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dashboard::routes;
    use crate::features::reports::models::ReportStatus;
    use crate::shared::test_helpers::{admin_user, citizen_user, sample_report, seeded_pool, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_stats_for_admin() {
        let reports = Arc::new(ReportService::new(seeded_pool().await));
        let id = reports
            .create(&sample_report("Large pothole on main street"))
            .await
            .unwrap();
        reports
            .create(&sample_report("Broken streetlight on corner"))
            .await
            .unwrap();
        reports
            .update_status(id, ReportStatus::Verifying, None)
            .await
            .unwrap();

        let server =
            TestServer::new(with_user(routes(reports), Some(admin_user()))).unwrap();
        let body: Value = server.get("/api/stats").await.json();
        assert_eq!(
            body,
            json!({ "Pending": 1, "Verifying": 1, "Solved": 0, "Rejected": 0, "Total": 2 })
        );
    }

    #[tokio::test]
    async fn test_stats_denied_for_others() {
        let reports = Arc::new(ReportService::new(seeded_pool().await));

        let citizen =
            TestServer::new(with_user(routes(reports.clone()), Some(citizen_user()))).unwrap();
        citizen
            .get("/api/stats")
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let anonymous = TestServer::new(with_user(routes(reports), None)).unwrap();
        anonymous
            .get("/api/stats")
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }
}
