#[cfg(test)]
use crate::core::config::SessionConfig;
#[cfg(test)]
use crate::core::database;
#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, RequestContext, Role};
#[cfg(test)]
use crate::features::auth::SessionManager;
#[cfg(test)]
use crate::features::reports::models::{CreateReport, ReportCategory};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
#[cfg(test)]
use std::str::FromStr;

/// Fresh in-memory database without any tables.
///
/// A single connection that never expires, since each SQLite memory
/// connection is its own database.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(false);
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap()
}

/// In-memory database with the current schema
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = memory_pool().await;
    database::init_schema(&pool).await.unwrap();
    pool
}

/// Schema plus the `citizen_user` and `admin_user` accounts.
///
/// The hashes are placeholders, so these accounts cannot log in.
#[cfg(test)]
pub async fn seeded_pool() -> SqlitePool {
    let pool = test_pool().await;
    for user in [citizen_user(), admin_user()] {
        sqlx::query("INSERT INTO users (email, password_hash, role) VALUES (?, 'x', ?)")
            .bind(&user.email)
            .bind(user.role.as_str())
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

#[cfg(test)]
pub fn test_sessions() -> SessionManager {
    SessionManager::new(&SessionConfig {
        secret: "test-session-secret-that-is-long-enough".to_string(),
        ttl: std::time::Duration::from_secs(3600),
        cookie_secure: false,
    })
}

#[cfg(test)]
pub fn citizen_user() -> AuthenticatedUser {
    AuthenticatedUser {
        email: "citizen@example.com".to_string(),
        role: Role::Citizen,
    }
}

#[cfg(test)]
pub fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        email: "admin@example.com".to_string(),
        role: Role::Admin,
    }
}

/// Report data as a citizen would submit it
#[cfg(test)]
pub fn sample_report(comment: &str) -> CreateReport {
    CreateReport {
        location: "Main street and 5th".to_string(),
        address: "Main street 12".to_string(),
        comment: comment.to_string(),
        photo: "20240101_120000_photo.jpg".to_string(),
        email: Some("reporter@example.com".to_string()),
        category: ReportCategory::Roads,
        lat: 10.5,
        lng: -74.1,
        submitted_by: Some("citizen@example.com".to_string()),
    }
}

/// Run every request of `router` as `user` (anonymous when `None`), skipping the cookie
#[cfg(test)]
pub fn with_user(router: Router, user: Option<AuthenticatedUser>) -> Router {
    let ctx = match user {
        Some(user) => RequestContext::authenticated(user),
        None => RequestContext::anonymous(),
    };
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let ctx = ctx.clone();
            async move {
                request.extensions_mut().insert(ctx);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
