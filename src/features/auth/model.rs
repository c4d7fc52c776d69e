use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::auth::policy::{self, Action, Decision};
pub use crate::features::users::Role;

/// Identity carried by a valid session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Per-request caller context.
///
/// Inserted by the session middleware for every request and extracted by
/// handlers; anonymous callers get an empty context.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }

    /// Whether the policy allows this caller to perform `action`
    pub fn can(&self, action: Action) -> bool {
        policy::decide(self.role(), action) == Decision::Allow
    }

    /// Check `action` against the policy, mapping a refusal to the matching error
    pub fn authorize(&self, action: Action) -> Result<()> {
        match policy::decide(self.role(), action) {
            Decision::Allow => Ok(()),
            Decision::LoginRequired => Err(AppError::LoginRequired),
            Decision::Forbidden => Err(AppError::Forbidden("Permission denied".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citizen() -> RequestContext {
        RequestContext::authenticated(AuthenticatedUser {
            email: "citizen@example.com".to_string(),
            role: Role::Citizen,
        })
    }

    #[test]
    fn test_authorize_maps_decisions_to_errors() {
        assert!(RequestContext::anonymous()
            .authorize(Action::ListReports)
            .is_ok());
        assert!(matches!(
            RequestContext::anonymous().authorize(Action::CreateReport),
            Err(AppError::LoginRequired)
        ));
        assert!(matches!(
            citizen().authorize(Action::DeleteReport),
            Err(AppError::Forbidden(_))
        ));
        assert!(citizen().authorize(Action::CreateReport).is_ok());
    }

    #[test]
    fn test_context_accessors() {
        let ctx = citizen();
        assert_eq!(ctx.role(), Some(Role::Citizen));
        assert_eq!(ctx.email(), Some("citizen@example.com"));
        assert!(!ctx.can(Action::ViewReporterEmail));

        let anon = RequestContext::anonymous();
        assert_eq!(anon.role(), None);
        assert_eq!(anon.email(), None);
    }
}
