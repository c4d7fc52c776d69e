use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{ReportLifecycle, ReportService};
use crate::modules::storage::PhotoStore;

/// Create routes for the reports feature
///
/// Every handler checks the caller against the policy itself; the session
/// middleware only has to be applied by the caller.
pub fn routes(
    report_service: Arc<ReportService>,
    photo_store: Arc<dyn PhotoStore>,
    max_photo_size: usize,
) -> Router {
    let state = ReportState {
        lifecycle: Arc::new(ReportLifecycle::new(report_service.clone())),
        report_service,
        photo_store,
        max_photo_size,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).delete(handlers::delete_report),
        )
        .route("/api/reports/{id}/status", put(handlers::update_report_status))
        .route(
            "/api/reports/{id}/category",
            put(handlers::update_report_category),
        )
        .with_state(state)
}
