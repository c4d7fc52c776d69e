use axum::{routing::get, Router};

use crate::features::pages::handlers;

/// HTML pages and the health probe
pub fn routes() -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/index", get(handlers::index_page))
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/admin", get(handlers::admin_page))
        .route("/health", get(handlers::health_check))
}
