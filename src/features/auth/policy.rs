//! Authorization policy: which role may perform which action.
//!
//! | Access        | Anonymous      | Citizen   | Admin |
//! |---------------|----------------|-----------|-------|
//! | Public        | allow          | allow     | allow |
//! | Authenticated | login required | allow     | allow |
//! | Admin         | login required | forbidden | allow |
//!
//! Roles never change within a session, so a decision depends only on the
//! role the session was issued with.

use crate::features::users::Role;

/// Everything a caller can ask the service to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewIndexPage,
    ViewLoginPage,
    ListReports,
    CreateReport,
    ReadReport,
    Logout,
    ViewDashboardPage,
    ViewOwnProfile,
    ViewReporterEmail,
    UpdateReportStatus,
    UpdateReportCategory,
    DeleteReport,
    ViewStats,
    ViewAdminPage,
}

/// Minimum access level an action needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No session; send the caller to the login page
    LoginRequired,
    /// Session present but the role lacks the permission
    Forbidden,
}

impl Action {
    pub fn required_access(self) -> Access {
        match self {
            Action::ViewIndexPage | Action::ViewLoginPage | Action::ListReports => Access::Public,

            Action::CreateReport
            | Action::ReadReport
            | Action::Logout
            | Action::ViewDashboardPage
            | Action::ViewOwnProfile => Access::Authenticated,

            Action::ViewReporterEmail
            | Action::UpdateReportStatus
            | Action::UpdateReportCategory
            | Action::DeleteReport
            | Action::ViewStats
            | Action::ViewAdminPage => Access::Admin,
        }
    }
}

/// Decide whether a caller with `role` (None = anonymous) may perform `action`
pub fn decide(role: Option<Role>, action: Action) -> Decision {
    match (action.required_access(), role) {
        (Access::Public, _) => Decision::Allow,
        (_, None) => Decision::LoginRequired,
        (Access::Authenticated, Some(_)) => Decision::Allow,
        (Access::Admin, Some(Role::Admin)) => Decision::Allow,
        (Access::Admin, Some(Role::Citizen)) => Decision::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: &[Action] = &[
        Action::ViewIndexPage,
        Action::ViewLoginPage,
        Action::ListReports,
        Action::CreateReport,
        Action::ReadReport,
        Action::Logout,
        Action::ViewDashboardPage,
        Action::ViewOwnProfile,
        Action::ViewReporterEmail,
        Action::UpdateReportStatus,
        Action::UpdateReportCategory,
        Action::DeleteReport,
        Action::ViewStats,
        Action::ViewAdminPage,
    ];

    #[test]
    fn test_admin_may_do_everything() {
        for action in ALL_ACTIONS {
            assert_eq!(decide(Some(Role::Admin), *action), Decision::Allow, "{:?}", action);
        }
    }

    #[test]
    fn test_citizen_table() {
        let allowed = [
            Action::ViewIndexPage,
            Action::ViewLoginPage,
            Action::ListReports,
            Action::CreateReport,
            Action::ReadReport,
            Action::Logout,
            Action::ViewDashboardPage,
            Action::ViewOwnProfile,
        ];
        for action in ALL_ACTIONS {
            let expected = if allowed.contains(action) {
                Decision::Allow
            } else {
                Decision::Forbidden
            };
            assert_eq!(decide(Some(Role::Citizen), *action), expected, "{:?}", action);
        }
    }

    #[test]
    fn test_anonymous_only_reaches_public_actions() {
        for action in ALL_ACTIONS {
            let expected = if action.required_access() == Access::Public {
                Decision::Allow
            } else {
                Decision::LoginRequired
            };
            assert_eq!(decide(None, *action), expected, "{:?}", action);
        }
        assert_eq!(decide(None, Action::ListReports), Decision::Allow);
        assert_eq!(decide(None, Action::DeleteReport), Decision::LoginRequired);
    }
}
