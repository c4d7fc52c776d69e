use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppJsonRejection, AppPath};
use crate::features::auth::model::RequestContext;
use crate::features::auth::policy::Action;
use crate::features::reports::dtos::{
    CreateReportForm, CreateReportMultipart, DeleteReportDto, ListReportsQuery, PhotoUpload,
    ReportResponseDto, UpdateReportCategoryDto, UpdateReportStatusDto,
};
use crate::features::reports::models::ReportCategory;
use crate::features::reports::services::{ReportLifecycle, ReportService};
use crate::modules::storage::PhotoStore;
use crate::shared::types::{ActionResponse, ErrorResponse};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub lifecycle: Arc<ReportLifecycle>,
    pub photo_store: Arc<dyn PhotoStore>,
    pub max_photo_size: usize,
}

/// List reports (public, reporter identity hidden unless admin)
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports, newest first", body = Vec<ReportResponseDto>),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    ctx: RequestContext,
    State(state): State<ReportState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<ReportResponseDto>>> {
    ctx.authorize(Action::ListReports)?;

    let reports = state
        .report_service
        .list(query.status.as_deref(), query.category.as_deref())
        .await?;
    let dtos = reports
        .into_iter()
        .map(|r| ReportResponseDto::for_viewer(r, &ctx))
        .collect();
    Ok(Json(dtos))
}

async fn read_form(mut multipart: Multipart) -> Result<CreateReportForm> {
    let mut form = CreateReportForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "photo" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read photo: {}", e)))?;
            form.photo = Some(PhotoUpload { filename, data });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
        match name.as_str() {
            "location" => form.location = value,
            "address" => form.address = value,
            "comment" => form.comment = value,
            "category" => form.category = value,
            "email" => form.email = value,
            "lat" => form.lat = Some(value),
            "lng" => form.lng = Some(value),
            _ => tracing::debug!("Ignoring multipart field {}", name),
        }
    }

    Ok(form)
}

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(content = CreateReportMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report created", body = ActionResponse),
        (status = 303, description = "Not logged in, redirected to /login"),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn create_report(
    ctx: RequestContext,
    State(state): State<ReportState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ActionResponse>)> {
    ctx.authorize(Action::CreateReport)?;
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let form = read_form(multipart).await?;
    let submitted_by = ctx.email().map(str::to_string);
    let (mut report, photo, photo_name) = form.into_report(submitted_by, state.max_photo_size)?;

    report.photo = state.photo_store.save(&photo_name, &photo.data).await?;

    let id = match state.report_service.create(&report).await {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = state.photo_store.remove(&report.photo).await {
                tracing::warn!("Failed to remove orphaned photo: {}", cleanup);
            }
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::created("Report submitted successfully", id)),
    ))
}

/// Get a single report
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ReportResponseDto),
        (status = 303, description = "Not logged in, redirected to /login"),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_report(
    ctx: RequestContext,
    State(state): State<ReportState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ReportResponseDto>> {
    ctx.authorize(Action::ReadReport)?;

    let report = state
        .report_service
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;
    Ok(Json(ReportResponseDto::for_viewer(report, &ctx)))
}

/// Move a report to another status (admin only)
#[utoipa::path(
    put,
    path = "/api/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ActionResponse),
        (status = 400, description = "Invalid status or missing rejection reason", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn update_report_status(
    ctx: RequestContext,
    State(state): State<ReportState>,
    AppPath(id): AppPath<i64>,
    payload: std::result::Result<AppJson<UpdateReportStatusDto>, AppJsonRejection>,
) -> Result<Json<ActionResponse>> {
    ctx.authorize(Action::UpdateReportStatus)?;
    let AppJson(dto) = payload?;

    let change = state
        .lifecycle
        .transition(id, &dto.status, dto.rejection_reason.as_deref())
        .await?;
    Ok(Json(ActionResponse::ok(format!(
        "Status updated to {}",
        change.status
    ))))
}

/// Change the category of a report (admin only)
#[utoipa::path(
    put,
    path = "/api/reports/{id}/category",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateReportCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ActionResponse),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn update_report_category(
    ctx: RequestContext,
    State(state): State<ReportState>,
    AppPath(id): AppPath<i64>,
    payload: std::result::Result<AppJson<UpdateReportCategoryDto>, AppJsonRejection>,
) -> Result<Json<ActionResponse>> {
    ctx.authorize(Action::UpdateReportCategory)?;
    let AppJson(dto) = payload?;

    let category: ReportCategory = dto
        .category
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid category".to_string()))?;

    if !state.report_service.update_category(id, category).await? {
        return Err(AppError::NotFound("Report not found".to_string()));
    }

    tracing::info!("Report {} recategorized as {}", id, category);
    Ok(Json(ActionResponse::ok(format!(
        "Category updated to {}",
        category
    ))))
}

/// Delete a report with a justification (admin only).
///
/// The justification is echoed in the response and not kept.
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = DeleteReportDto,
    responses(
        (status = 200, description = "Report deleted", body = ActionResponse),
        (status = 400, description = "Missing or short justification", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn delete_report(
    ctx: RequestContext,
    State(state): State<ReportState>,
    AppPath(id): AppPath<i64>,
    payload: std::result::Result<AppJson<DeleteReportDto>, AppJsonRejection>,
) -> Result<Json<ActionResponse>> {
    ctx.authorize(Action::DeleteReport)?;
    let AppJson(dto) = payload?;

    let justification = dto.validated_justification()?;

    if !state.report_service.delete(id).await? {
        return Err(AppError::NotFound("Report not found".to_string()));
    }

    tracing::info!("Report {} deleted", id);
    Ok(Json(ActionResponse::ok(format!(
        "Report deleted. Reason: {}",
        justification
    ))))
}
