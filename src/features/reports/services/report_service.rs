use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    CreateReport, Report, ReportCategory, ReportStats, ReportStatus,
};
use crate::shared::constants::FILTER_ALL;

const REPORT_COLUMNS: &str = "id, location, address, comment, photo, email, category, status, \
     rejection_reason, lat, lng, created_at, submitted_by";

/// `None`, empty and "All" mean no filter. Anything else is matched literally,
/// so an unknown value matches no rows.
fn active_filter(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != FILTER_ALL)
}

/// Service for report records
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new report. Status starts as Pending with no rejection reason;
    /// `created_at` comes from the server clock.
    pub async fn create(&self, data: &CreateReport) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO reports
                (location, address, comment, photo, email, category, status,
                 rejection_reason, lat, lng, created_at, submitted_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.location)
        .bind(&data.address)
        .bind(&data.comment)
        .bind(&data.photo)
        .bind(&data.email)
        .bind(data.category.label())
        .bind(ReportStatus::Pending.as_str())
        .bind(data.lat)
        .bind(data.lng)
        .bind(Utc::now())
        .bind(&data.submitted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        let id = result.last_insert_rowid();
        tracing::info!("Created report: {} ({})", id, data.category);
        Ok(id)
    }

    /// Get report by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Report>> {
        sqlx::query_as::<_, Report>(&format!(
            "SELECT {} FROM reports WHERE id = ?",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            AppError::Database(e)
        })
    }

    /// List reports, newest first, optionally filtered by status and category
    pub async fn list(&self, status: Option<&str>, category: Option<&str>) -> Result<Vec<Report>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM reports WHERE 1=1", REPORT_COLUMNS));

        if let Some(status) = active_filter(status) {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(category) = active_filter(category) {
            query.push(" AND category = ").push_bind(category);
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        query
            .build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Set the status of a report in a single statement.
    ///
    /// The reason is stored only for `Rejected`; any other status clears it.
    /// Returns `false` when no report has this id.
    pub async fn update_status(
        &self,
        id: i64,
        status: ReportStatus,
        rejection_reason: Option<&str>,
    ) -> Result<bool> {
        let reason = if status.requires_reason() {
            rejection_reason
        } else {
            None
        };

        let result = sqlx::query("UPDATE reports SET status = ?, rejection_reason = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(reason)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report status: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Change the category of a report. Returns `false` when no report has this id.
    pub async fn update_category(&self, id: i64, category: ReportCategory) -> Result<bool> {
        let result = sqlx::query("UPDATE reports SET category = ? WHERE id = ?")
            .bind(category.label())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report category: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a report. Returns `true` only if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Count reports per status
    pub async fn aggregate_counts(&self) -> Result<ReportStats> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM reports GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count reports: {:?}", e);
                    AppError::Database(e)
                })?;

        let mut stats = ReportStats::default();
        for (status, count) in rows {
            stats.add(&status, count);
        }
        Ok(stats)
    }
}
