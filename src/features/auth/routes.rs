use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

/// Login/logout pages and the auth API
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route("/logout", get(handlers::logout))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}
