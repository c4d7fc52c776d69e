use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::RequestContext;
use crate::features::auth::policy::Action;
use crate::features::reports::models::{CreateReport, Report, ReportCategory};
use crate::shared::constants::UPLOADS_URL_PREFIX;
use crate::shared::validation::{is_allowed_photo, sanitize_filename};

/// Response DTO for report.
///
/// `email` and `submitted_by` are only filled in for callers allowed to see
/// who filed the report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub location: String,
    pub address: Option<String>,
    pub comment: String,
    /// Stored photo file name
    pub photo: String,
    /// Public URL of the photo
    pub photo_url: String,
    pub email: Option<String>,
    pub category: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
    pub submitted_by: Option<String>,
}

impl ReportResponseDto {
    /// Build the response for a caller, redacting reporter identity unless allowed
    pub fn for_viewer(report: Report, ctx: &RequestContext) -> Self {
        let mut dto = Self::from(report);
        if !ctx.can(Action::ViewReporterEmail) {
            dto.email = None;
            dto.submitted_by = None;
        }
        dto
    }
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            photo_url: format!("{}/{}", UPLOADS_URL_PREFIX, r.photo),
            id: r.id,
            location: r.location,
            address: r.address,
            comment: r.comment,
            photo: r.photo,
            email: r.email,
            category: r.category,
            status: r.status,
            rejection_reason: r.rejection_reason,
            lat: r.lat,
            lng: r.lng,
            created_at: r.created_at,
            submitted_by: r.submitted_by,
        }
    }
}

/// Query parameters for listing reports
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReportsQuery {
    /// Status to match exactly; "All" or absent lists every status
    pub status: Option<String>,
    /// Category label to match exactly; "All" or absent lists every category
    pub category: Option<String>,
}

/// Photo part of a report submission
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub filename: String,
    pub data: Bytes,
}

impl PhotoUpload {
    /// Check the upload and return the sanitized file name to store it under
    pub fn validate(&self, max_size: usize) -> Result<String> {
        if self.filename.trim().is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }
        if !is_allowed_photo(&self.filename) {
            return Err(AppError::Validation("File type not allowed".to_string()));
        }
        if self.data.is_empty() {
            return Err(AppError::Validation("Photo file is empty".to_string()));
        }
        if self.data.len() > max_size {
            return Err(AppError::Validation(format!(
                "Photo exceeds the maximum size of {} bytes",
                max_size
            )));
        }

        let name = sanitize_filename(&self.filename)
            .filter(|name| is_allowed_photo(name))
            .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;
        Ok(name)
    }
}

/// Multipart report submission.
///
/// Text fields arrive as strings; [`CreateReportForm::into_report`] turns them
/// into typed values.
#[derive(Debug, Default, Validate)]
pub struct CreateReportForm {
    pub location: String,
    pub address: String,
    #[validate(length(min = 10, message = "Comment must be at least 10 characters"))]
    pub comment: String,
    pub category: String,
    pub email: String,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub photo: Option<PhotoUpload>,
}

/// Request schema for `POST /api/reports` (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateReportMultipart {
    pub location: String,
    pub address: Option<String>,
    pub comment: String,
    pub category: Option<ReportCategory>,
    pub email: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

fn parse_coordinate(value: &str, name: &str, limit: f64) -> Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", name)))?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(AppError::Validation(format!(
            "{} must be between -{} and {}",
            name, limit, limit
        )));
    }
    Ok(parsed)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl CreateReportForm {
    /// Validate every field and split off the photo.
    ///
    /// The returned [`CreateReport`] has an empty `photo`; it is filled in once
    /// the upload has been stored. Nothing is written before this succeeds.
    pub fn into_report(
        mut self,
        submitted_by: Option<String>,
        max_photo_size: usize,
    ) -> Result<(CreateReport, PhotoUpload, String)> {
        let (lat, lng) = match (self.lat.as_deref(), self.lng.as_deref()) {
            (Some(lat), Some(lng)) if !lat.trim().is_empty() && !lng.trim().is_empty() => (
                parse_coordinate(lat, "Latitude", 90.0)?,
                parse_coordinate(lng, "Longitude", 180.0)?,
            ),
            _ => {
                return Err(AppError::Validation(
                    "Location must be marked on the map".to_string(),
                ))
            }
        };

        self.comment = self.comment.trim().to_string();
        self.validate()?;

        let photo = self
            .photo
            .take()
            .ok_or_else(|| AppError::Validation("Photo is required".to_string()))?;
        let photo_name = photo.validate(max_photo_size)?;

        let category = match self.category.trim() {
            "" => ReportCategory::default(),
            label => label
                .parse::<ReportCategory>()
                .map_err(|_| AppError::Validation("Invalid category".to_string()))?,
        };

        let report = CreateReport {
            location: self.location.trim().to_string(),
            address: self.address.trim().to_string(),
            comment: self.comment,
            photo: String::new(),
            email: non_empty(self.email),
            category,
            lat,
            lng,
            submitted_by,
        };
        Ok((report, photo, photo_name))
    }
}

/// Request DTO for changing report status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    /// One of Pending, Verifying, Solved, Rejected
    pub status: String,
    /// Required (at least 10 characters) when status is Rejected
    pub rejection_reason: Option<String>,
}

/// Request DTO for changing report category
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportCategoryDto {
    pub category: String,
}

/// Request DTO for deleting a report.
///
/// The justification is checked and echoed back, never stored.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeleteReportDto {
    #[serde(rename = "comentario", default)]
    #[validate(length(
        min = 10,
        message = "A justification of at least 10 characters is required to delete a report"
    ))]
    pub justification: String,
}

impl DeleteReportDto {
    /// Trimmed justification, validated
    pub fn validated_justification(&self) -> Result<String> {
        let dto = DeleteReportDto {
            justification: self.justification.trim().to_string(),
        };
        dto.validate()?;
        Ok(dto.justification)
    }
}
