use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::RegisterRequestDto;
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::auth::session::SessionManager;
use crate::features::users::CredentialService;

/// Service for signing in and registering
pub struct AuthService {
    credentials: Arc<CredentialService>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(credentials: Arc<CredentialService>, sessions: Arc<SessionManager>) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Check credentials. Unknown email and wrong password look the same to the caller.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>> {
        let Some(user) = self.credentials.find_by_email(email).await? else {
            CredentialService::verify_unknown_account(password);
            tracing::info!("Login failed: unknown account");
            return Ok(None);
        };

        if !CredentialService::verify_password(password, &user.password_hash) {
            tracing::info!("Login failed for {}", user.email);
            return Ok(None);
        }

        tracing::info!("Login succeeded for {} ({})", user.email, user.role());
        Ok(Some(AuthenticatedUser {
            role: user.role(),
            email: user.email,
        }))
    }

    /// Authenticate and sign a session token in one step
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<(AuthenticatedUser, String)>> {
        match self.authenticate(email, password).await? {
            Some(user) => {
                let token = self.sessions.issue(&user)?;
                Ok(Some((user, token)))
            }
            None => Ok(None),
        }
    }

    /// Register a citizen account
    pub async fn register(&self, dto: &RegisterRequestDto) -> Result<AuthenticatedUser> {
        let email = dto.email.trim();

        if !self
            .credentials
            .create_user(email, &dto.password, Role::Citizen)
            .await?
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        Ok(AuthenticatedUser {
            email: email.to_string(),
            role: Role::Citizen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_pool, test_sessions};

    async fn service() -> AuthService {
        let credentials = Arc::new(CredentialService::new(test_pool().await));
        credentials
            .create_user("admin@example.com", "admin123", Role::Admin)
            .await
            .unwrap();
        AuthService::new(credentials, Arc::new(test_sessions()))
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_session() {
        let service = service().await;

        let (user, token) = service
            .login("admin@example.com", "admin123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(service.sessions().verify(&token), Some(user));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let service = service().await;

        assert!(service
            .login("admin@example.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(service
            .login("ghost@example.com", "admin123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let service = service().await;
        let dto = RegisterRequestDto {
            email: "new@example.com".to_string(),
            password: "long-enough".to_string(),
        };

        let user = service.register(&dto).await.unwrap();
        assert_eq!(user.role, Role::Citizen);
        assert!(matches!(
            service.register(&dto).await,
            Err(AppError::Conflict(_))
        ));
    }
}
