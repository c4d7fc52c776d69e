//! Report status transitions.
//!
//! Any status may move to any other status. The only guard is on entering
//! `Rejected`, which needs a reason; every other target clears the reason.

use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::ReportStatus;
use crate::features::reports::services::ReportService;
use crate::shared::constants::MIN_TEXT_LENGTH;

/// A validated status change, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ReportStatus,
    /// Present exactly when `status` is `Rejected`
    pub rejection_reason: Option<String>,
}

impl StatusChange {
    /// Parse and check a requested transition before anything is written
    pub fn validate(status: &str, rejection_reason: Option<&str>) -> Result<Self> {
        let status: ReportStatus = status
            .parse()
            .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

        if !status.requires_reason() {
            return Ok(Self {
                status,
                rejection_reason: None,
            });
        }

        let reason = rejection_reason.map(str::trim).unwrap_or_default();
        if (reason.chars().count() as u64) < MIN_TEXT_LENGTH {
            return Err(AppError::Validation(format!(
                "A rejection reason of at least {} characters is required",
                MIN_TEXT_LENGTH
            )));
        }

        Ok(Self {
            status,
            rejection_reason: Some(reason.to_string()),
        })
    }
}

/// Applies status changes to stored reports
pub struct ReportLifecycle {
    reports: Arc<ReportService>,
}

impl ReportLifecycle {
    pub fn new(reports: Arc<ReportService>) -> Self {
        Self { reports }
    }

    /// Validate and apply a transition. Unknown ids are `NotFound`; on any
    /// error the stored report is left untouched.
    pub async fn transition(
        &self,
        id: i64,
        status: &str,
        rejection_reason: Option<&str>,
    ) -> Result<StatusChange> {
        let change = StatusChange::validate(status, rejection_reason)?;

        let updated = self
            .reports
            .update_status(id, change.status, change.rejection_reason.as_deref())
            .await?;
        if !updated {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report {} moved to {}", id, change.status);
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_report, seeded_pool};

    async fn lifecycle() -> (ReportLifecycle, Arc<ReportService>) {
        let reports = Arc::new(ReportService::new(seeded_pool().await));
        (ReportLifecycle::new(reports.clone()), reports)
    }

    #[test]
    fn test_validate_statuses() {
        for status in ReportStatus::ALL {
            let reason = status.requires_reason().then_some("Duplicate report");
            let change = StatusChange::validate(status.as_str(), reason).unwrap();
            assert_eq!(change.status, status);
        }

        assert!(matches!(
            StatusChange::validate("Closed", None),
            Err(AppError::Validation(_))
        ));
        assert!(StatusChange::validate("pending", None).is_err());
    }

    #[test]
    fn test_rejection_needs_reason() {
        assert!(StatusChange::validate("Rejected", None).is_err());
        assert!(StatusChange::validate("Rejected", Some("too short")).is_err());
        assert!(StatusChange::validate("Rejected", Some("   short      ")).is_err());

        let change = StatusChange::validate("Rejected", Some("  Duplicate report ")).unwrap();
        assert_eq!(change.rejection_reason.as_deref(), Some("Duplicate report"));
    }

    #[test]
    fn test_reason_dropped_for_other_statuses() {
        let change = StatusChange::validate("Solved", Some("Fixed by the city crew")).unwrap();
        assert_eq!(change.rejection_reason, None);
    }

    #[tokio::test]
    async fn test_reject_then_reopen_clears_reason() {
        let (lifecycle, reports) = lifecycle().await;
        let id = reports
            .create(&sample_report("Large pothole on main street"))
            .await
            .unwrap();

        lifecycle
            .transition(id, "Rejected", Some("Duplicate report"))
            .await
            .unwrap();
        let report = reports.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(report.status, "Rejected");
        assert_eq!(report.rejection_reason.as_deref(), Some("Duplicate report"));

        lifecycle.transition(id, "Pending", None).await.unwrap();
        let report = reports.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(report.status, "Pending");
        assert_eq!(report.rejection_reason, None);
    }

    #[tokio::test]
    async fn test_failed_transition_leaves_report_unchanged() {
        let (lifecycle, reports) = lifecycle().await;
        let id = reports
            .create(&sample_report("Broken traffic light"))
            .await
            .unwrap();
        lifecycle.transition(id, "Verifying", None).await.unwrap();

        assert!(matches!(
            lifecycle.transition(id, "Rejected", Some("short")).await,
            Err(AppError::Validation(_))
        ));
        let report = reports.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(report.status, "Verifying");
        assert_eq!(report.rejection_reason, None);
    }

    #[tokio::test]
    async fn test_any_status_can_follow_any_other() {
        let (lifecycle, reports) = lifecycle().await;
        let id = reports
            .create(&sample_report("Overflowing trash bins"))
            .await
            .unwrap();

        for from in ReportStatus::ALL {
            for to in ReportStatus::ALL {
                let reason = from.requires_reason().then_some("Out of our district");
                lifecycle.transition(id, from.as_str(), reason).await.unwrap();
                let reason = to.requires_reason().then_some("Out of our district");
                lifecycle.transition(id, to.as_str(), reason).await.unwrap();

                let report = reports.find_by_id(id).await.unwrap().unwrap();
                assert_eq!(report.status, to.as_str());
                assert_eq!(report.rejection_reason.is_some(), to.requires_reason());
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_report() {
        let (lifecycle, _) = lifecycle().await;
        assert!(matches!(
            lifecycle.transition(77, "Solved", None).await,
            Err(AppError::NotFound(_))
        ));
    }
}
