mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, DocsInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, AuthService, SessionManager};
use crate::features::dashboard::routes as dashboard_routes;
use crate::features::pages::routes as pages_routes;
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::users::CredentialService;
use crate::modules::storage::{LocalStorage, PhotoStore};
use crate::shared::constants::UPLOADS_URL_PREFIX;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{routing::get, Json, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Compose every feature router with the shared layers
fn build_router(
    config: &Config,
    pool: SqlitePool,
    photo_store: Arc<dyn PhotoStore>,
) -> Router {
    let sessions = Arc::new(SessionManager::new(&config.session));
    let credential_service = Arc::new(CredentialService::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(
        credential_service,
        Arc::clone(&sessions),
    ));
    let report_service = Arc::new(ReportService::new(pool));

    // OpenAPI document with info from config
    let mut openapi = ApiDoc::openapi();
    DocsInfoModifier {
        title: config.docs.title.clone(),
        version: config.docs.version.clone(),
        description: config.docs.description.clone(),
    }
    .modify(&mut openapi);

    let docs = Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = openapi.clone();
            async move { Json(doc) }
        }),
    );
    let docs = if let Some(credentials) = config.docs.credentials() {
        tracing::info!("API docs basic auth enabled");
        docs.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        ))))
    } else {
        tracing::info!("API docs basic auth disabled (no credentials configured)");
        docs
    };

    Router::new()
        .merge(docs)
        .merge(pages_routes())
        .merge(auth_routes::routes(auth_service))
        .merge(reports_routes(
            Arc::clone(&report_service),
            photo_store,
            config.upload.max_photo_size,
        ))
        .merge(dashboard_routes(report_service))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&config.upload.dir))
        // Every handler receives a RequestContext resolved from the session cookie
        .layer(from_fn_with_state(sessions, middleware::session_middleware))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Create tables and add columns missing from older databases
    tracing::info!("Initializing database schema...");
    database::init_schema(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Schema initialization failed: {}", e))?;
    tracing::info!("Database schema ready");

    // Seed startup accounts
    CredentialService::new(pool.clone())
        .seed(&config.seed)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed accounts: {}", e))?;

    // Local storage for report photos
    let photo_store = Arc::new(
        LocalStorage::new(config.upload.dir.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize photo storage: {}", e))?,
    );

    let app = build_router(&config, pool, photo_store);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "OpenAPI document available at {}",
        format!("http://{}/api-docs/openapi.json", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{
        AppConfig, DatabaseConfig, DocsConfig, SeedConfig, SessionConfig, UploadConfig,
    };
    use crate::features::auth::model::{AuthenticatedUser, Role};
    use crate::shared::test_helpers::test_pool;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::{TestResponse, TestServer};
    use serde_json::{json, Value};

    fn test_config(upload_dir: &std::path::Path) -> Config {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_allowed_origins: vec!["*".to_string()],
                max_request_body_size: 6 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                acquire_timeout_secs: 5,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            session: SessionConfig {
                secret: "test-session-secret-that-is-long-enough".to_string(),
                ttl: std::time::Duration::from_secs(3600),
                cookie_secure: false,
            },
            upload: UploadConfig {
                dir: upload_dir.to_path_buf(),
                max_photo_size: 5 * 1024 * 1024,
            },
            seed: SeedConfig::default(),
            docs: DocsConfig {
                username: None,
                password: None,
                title: "Civic Reports API".to_string(),
                version: "test".to_string(),
                description: "Test".to_string(),
            },
        }
    }

    struct App {
        server: TestServer,
        _upload_dir: tempfile::TempDir,
    }

    async fn app() -> App {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = test_config(upload_dir.path());
        let pool = test_pool().await;

        let credentials = CredentialService::new(pool.clone());
        credentials
            .create_user("admin@example.com", "admin123", Role::Admin)
            .await
            .unwrap();
        credentials
            .create_user("citizen@example.com", "citizen123", Role::Citizen)
            .await
            .unwrap();

        let store = Arc::new(LocalStorage::new(upload_dir.path()).await.unwrap());
        let server = TestServer::new(build_router(&config, pool, store)).unwrap();
        App {
            server,
            _upload_dir: upload_dir,
        }
    }

    /// `name=value` part of the session cookie set by a login response
    fn session_cookie(response: &TestResponse) -> HeaderValue {
        let set_cookie = response.header(header::SET_COOKIE);
        let pair = set_cookie
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(pair.starts_with("session="));
        HeaderValue::from_str(&pair).unwrap()
    }

    fn pothole_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("location", "Main street")
            .add_text("comment", "Large pothole on main street")
            .add_text("category", "Roads")
            .add_text("email", "reporter@example.com")
            .add_text("lat", "10.5")
            .add_text("lng", "-74.1")
            .add_part(
                "photo",
                Part::bytes(b"fake-png".to_vec()).file_name("hole.png"),
            )
    }

    async fn login(server: &TestServer, email: &str, password: &str) -> HeaderValue {
        let response = server
            .post("/login")
            .form(&[("email", email), ("password", password)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        session_cookie(&response)
    }

    #[tokio::test]
    async fn test_login_redirects_by_role() {
        let app = app().await;

        let response = app
            .server
            .post("/login")
            .form(&[("email", "admin@example.com"), ("password", "admin123")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/admin");
        let set_cookie = response.header(header::SET_COOKIE);
        assert!(set_cookie.to_str().unwrap().contains("Max-Age=3600"));

        let response = app
            .server
            .post("/login")
            .form(&[("email", "citizen@example.com"), ("password", "citizen123")])
            .await;
        assert_eq!(response.header(header::LOCATION), "/dashboard");
    }

    #[tokio::test]
    async fn test_failed_login_shows_form_again() {
        let app = app().await;
        let response = app
            .server
            .post("/login")
            .form(&[("email", "admin@example.com"), ("password", "wrong")])
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("Incorrect email or password."));
    }

    #[tokio::test]
    async fn test_session_cookie_drives_authorization() {
        let app = app().await;
        let citizen = login(&app.server, "citizen@example.com", "citizen123").await;
        let admin = login(&app.server, "admin@example.com", "admin123").await;

        let response = app
            .server
            .post("/api/reports")
            .add_header(header::COOKIE, citizen.clone())
            .multipart(pothole_form())
            .await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["id"].as_i64().unwrap();

        // Citizens never see reporter emails
        let body: Value = app
            .server
            .get("/api/reports")
            .add_header(header::COOKIE, citizen.clone())
            .await
            .json();
        assert!(body[0]["email"].is_null());

        app.server
            .get("/api/stats")
            .add_header(header::COOKIE, citizen.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let body: Value = app
            .server
            .get(&format!("/api/reports/{}", id))
            .add_header(header::COOKIE, admin.clone())
            .await
            .json();
        assert_eq!(body["email"], "reporter@example.com");
        assert_eq!(body["status"], "Pending");

        let stats: Value = app
            .server
            .get("/api/stats")
            .add_header(header::COOKIE, admin.clone())
            .await
            .json();
        assert_eq!(stats["Pending"], 1);
        assert_eq!(stats["Total"], 1);

        // The stored photo is served back
        let photo = body["photo_url"].as_str().unwrap().to_string();
        let served = app.server.get(&photo).await;
        served.assert_status_ok();
        assert_eq!(served.as_bytes().as_ref(), b"fake-png");
    }

    #[tokio::test]
    async fn test_invalid_or_missing_session_is_anonymous() {
        let app = app().await;

        let response = app
            .server
            .get("/api/auth/me")
            .add_header(header::COOKIE, HeaderValue::from_static("session=forged"))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/login");

        app.server.get("/api/reports").await.assert_status_ok();
        app.server.get("/index").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_session_for_removed_account_can_still_submit() {
        let app = app().await;
        let sessions = SessionManager::new(&test_config(app._upload_dir.path()).session);
        let token = sessions
            .issue(&AuthenticatedUser {
                email: "ghost@example.com".to_string(),
                role: Role::Citizen,
            })
            .unwrap();
        let cookie = HeaderValue::from_str(&format!("session={}", token)).unwrap();

        let response = app
            .server
            .post("/api/reports")
            .add_header(header::COOKIE, cookie)
            .multipart(pothole_form())
            .await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["id"].as_i64().unwrap();

        let admin = login(&app.server, "admin@example.com", "admin123").await;
        let body: Value = app
            .server
            .get(&format!("/api/reports/{}", id))
            .add_header(header::COOKIE, admin)
            .await
            .json();
        assert_eq!(body["submitted_by"], "ghost@example.com");
    }

    #[tokio::test]
    async fn test_me_and_logout() {
        let app = app().await;
        let citizen = login(&app.server, "citizen@example.com", "citizen123").await;

        let me: Value = app
            .server
            .get("/api/auth/me")
            .add_header(header::COOKIE, citizen.clone())
            .await
            .json();
        assert_eq!(me, json!({ "email": "citizen@example.com", "role": "citizen" }));

        let response = app
            .server
            .get("/logout")
            .add_header(header::COOKIE, citizen)
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/index");
        let cleared = response.header(header::SET_COOKIE);
        assert!(cleared.to_str().unwrap().starts_with("session="));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let app = app().await;

        app.server
            .post("/api/auth/register")
            .json(&json!({ "email": "new@example.com", "password": "long-enough" }))
            .await
            .assert_status(StatusCode::CREATED);
        app.server
            .post("/api/auth/register")
            .json(&json!({ "email": "new@example.com", "password": "long-enough" }))
            .await
            .assert_status(StatusCode::CONFLICT);
        app.server
            .post("/api/auth/register")
            .json(&json!({ "email": "not-an-email", "password": "long-enough" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        login(&app.server, "new@example.com", "long-enough").await;
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let app = app().await;
        let doc: Value = app.server.get("/api-docs/openapi.json").await.json();
        assert_eq!(doc["info"]["title"], "Civic Reports API");
        assert!(doc["paths"]["/api/reports"].is_object());
    }
}
