use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::reports::ReportService;

/// Admin statistics routes
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/stats", get(handlers::get_stats))
        .with_state(report_service)
}
