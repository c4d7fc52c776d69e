use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::SqlitePool;

use crate::core::config::SeedConfig;
use crate::core::error::{AppError, Result};
use crate::features::users::models::{Role, User};

/// Well-formed Argon2id hash (default parameters) that no password matches
const UNKNOWN_ACCOUNT_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Service for sign-in identities
pub struct CredentialService {
    pool: SqlitePool,
}

impl CredentialService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a password with a fresh random salt
    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Malformed hashes never verify.
    pub fn verify_password(password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Spend the same hashing effort as `verify_password` for an email with no account
    pub fn verify_unknown_account(password: &str) {
        let _ = Self::verify_password(password, UNKNOWN_ACCOUNT_HASH);
    }

    /// Create a user.
    ///
    /// Returns `Ok(false)` when the email is already taken; the UNIQUE constraint
    /// decides, so concurrent registrations cannot both win.
    pub async fn create_user(&self, email: &str, password: &str, role: Role) -> Result<bool> {
        let password_hash = Self::hash_password(password)?;

        let result = sqlx::query("INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?)")
            .bind(email)
            .bind(&password_hash)
            .bind(role.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::info!("Created {} account: {}", role, email);
                Ok(true)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!("Account already exists: {}", email);
                Ok(false)
            }
            Err(e) => {
                tracing::error!("Failed to create user: {:?}", e);
                Err(AppError::Database(e))
            }
        }
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT email, password_hash, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Create the configured startup accounts. Existing accounts are left untouched.
    pub async fn seed(&self, config: &SeedConfig) -> Result<()> {
        let accounts = [
            (&config.admin_email, &config.admin_password, Role::Admin),
            (&config.citizen_email, &config.citizen_password, Role::Citizen),
        ];

        for (email, password, role) in accounts {
            if let (Some(email), Some(password)) = (email, password) {
                if !self.create_user(email, password, role).await? {
                    tracing::info!("Seed {} account already present: {}", role, email);
                }
            }
        }

        Ok(())
    }
}
