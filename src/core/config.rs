use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
    pub seed: SeedConfig,
    pub docs: DocsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Signing and lifetime settings for the `session` cookie
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl: Duration,
    /// Mark the cookie `Secure` (only sent over HTTPS)
    pub cookie_secure: bool,
}

// Keep the signing secret out of logs
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Local storage for report photos
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory photos are written to (served at `/static/uploads`)
    pub dir: PathBuf,
    /// Maximum accepted photo size in bytes
    pub max_photo_size: usize,
}

/// Accounts created at startup. A pair is only seeded when both values are set.
#[derive(Clone, Default)]
pub struct SeedConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub citizen_email: Option<String>,
    pub citizen_password: Option<String>,
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("admin_email", &self.admin_email)
            .field("citizen_email", &self.citizen_email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct DocsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            session: SessionConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            seed: SeedConfig::from_env(),
            docs: DocsConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 6 * 1024 * 1024; // 6MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_URL: &'static str = "sqlite:civic_reports.db?mode=rwc";
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SessionConfig {
    const DEFAULT_TTL_SECS: u64 = 31 * 24 * 3600; // 31 days
    const MIN_SECRET_LEN: usize = 32;

    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET environment variable is required".to_string())?;

        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "SESSION_SECRET must be at least {} characters",
                Self::MIN_SECRET_LEN
            ));
        }

        let ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            secret,
            ttl: Duration::from_secs(ttl_secs),
            cookie_secure,
        })
    }
}

impl UploadConfig {
    const DEFAULT_MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024; // 5MB

    pub fn from_env() -> Result<Self, String> {
        let dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".to_string());

        let max_photo_size = env::var("MAX_PHOTO_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_PHOTO_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_PHOTO_SIZE must be a valid number".to_string())?;

        Ok(Self {
            dir: PathBuf::from(dir),
            max_photo_size,
        })
    }
}

impl SeedConfig {
    pub fn from_env() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|s| !s.is_empty());

        Self {
            admin_email: non_empty("SEED_ADMIN_EMAIL"),
            admin_password: non_empty("SEED_ADMIN_PASSWORD"),
            citizen_email: non_empty("SEED_CITIZEN_EMAIL"),
            citizen_password: non_empty("SEED_CITIZEN_PASSWORD"),
        }
    }
}

impl DocsConfig {
    pub fn from_env() -> Self {
        // Only use credentials if they are non-empty
        let username = env::var("DOCS_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("DOCS_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("DOCS_TITLE").unwrap_or_else(|_| "Civic Reports API".to_string());
        let version = env::var("DOCS_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("DOCS_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen incident reports and admin triage".to_string());

        Self {
            username,
            password,
            title,
            version,
            description,
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_credentials_require_both_parts() {
        let mut docs = DocsConfig {
            username: Some("ops".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(docs.credentials(), None);

        docs.password = Some("secret".to_string());
        assert_eq!(docs.credentials(), Some("ops:secret".to_string()));
    }

    #[test]
    fn test_session_config_debug_hides_secret() {
        let config = SessionConfig {
            secret: "a-very-long-signing-secret-for-sessions".to_string(),
            ttl: Duration::from_secs(60),
            cookie_secure: false,
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("signing-secret"));
        assert!(rendered.contains("***"));
    }
}
