use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::{AuthenticatedUser, Role};

/// Request DTO for citizen self-registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login form posted from the login page (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize)]
pub struct LoginFormDto {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub email: String,
    pub role: Role,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            email: user.email,
            role: user.role,
        }
    }
}
