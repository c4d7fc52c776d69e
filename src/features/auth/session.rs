use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::model::{AuthenticatedUser, Role};
use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::SESSION_COOKIE;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Issues and verifies the signed token stored in the `session` cookie
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Sign a session token for `user`
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session: {}", e)))
    }

    /// Verify a session token. Tampered, foreign or expired tokens yield `None`.
    pub fn verify(&self, token: &str) -> Option<AuthenticatedUser> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(AuthenticatedUser {
                email: data.claims.sub,
                role: data.claims.role,
            }),
            Err(e) => {
                tracing::debug!("Ignoring invalid session token: {}", e);
                None
            }
        }
    }

    /// Cookie carrying a freshly issued session token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(time::Duration::seconds(self.ttl.as_secs() as i64))
            .build()
    }

    /// Cookie that removes the session when passed to `CookieJar::remove`
    pub fn removal_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}
