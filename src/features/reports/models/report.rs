use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for report.
///
/// `status` and `category` hold the stored text as-is; rows written by older
/// deployments may carry values outside the current enums.
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: i64,
    pub location: String,
    pub address: Option<String>,
    pub comment: String,
    pub photo: String,
    pub email: Option<String>,
    pub category: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
    pub submitted_by: Option<String>,
}

/// Validated data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub location: String,
    pub address: String,
    pub comment: String,
    pub photo: String,
    pub email: Option<String>,
    pub category: super::ReportCategory,
    pub lat: f64,
    pub lng: f64,
    pub submitted_by: Option<String>,
}
