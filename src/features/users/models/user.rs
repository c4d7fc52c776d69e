use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_CITIZEN};

/// Account role. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Citizen,
    Admin,
}

impl Role {
    /// Anything other than `admin` is treated as a citizen, including legacy role names.
    pub fn from_db(value: &str) -> Self {
        if value == ROLE_ADMIN {
            Role::Admin
        } else {
            Role::Citizen
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => ROLE_CITIZEN,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for a user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }
}
