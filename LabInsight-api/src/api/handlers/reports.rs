use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};
use validator::Validate;

use lab_insight_domain::entities::Report;
use lab_insight_domain::services::export::ExportFormat;
use lab_insight_domain::services::ReportServiceTrait;

use crate::entities::common::ErrorResponse;
use crate::entities::report::{ExportQueryParams, UploadReportRequest};

/// Service type for dependency injection
pub type ReportService = Arc<dyn ReportServiceTrait>;

/// Analyse an uploaded lab report and store the result
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = UploadReportRequest,
    responses(
        (status = 201, description = "Report analysed and stored", body = Report),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(service, request))]
pub async fn upload_report(
    State(service): State<ReportService>,
    Json(request): Json<UploadReportRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    if let Err(errors) = request.validate() {
        warn!("Invalid upload request: {}", errors);
        let details = serde_json::to_value(&errors).ok();
        return Err(ErrorResponse::validation_error("Invalid upload request", details));
    }

    info!("Analysing upload {:?}", request.file_name);
    let (file, id) = request.into_parts();
    let report = service.create_report(file, id).await?;
    info!("Report {} created in category {}", report.id, report.category);

    Ok((StatusCode::CREATED, Json(report)))
}

/// List stored reports, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    responses(
        (status = 200, description = "Stored reports", body = [Report]),
    ),
    tag = "reports"
)]
#[instrument(skip(service))]
pub async fn list_reports(State(service): State<ReportService>) -> impl IntoResponse {
    let reports = service.get_reports().await;
    info!("Returning {} reports", reports.len());
    Json(reports)
}

/// Get a single stored report
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = Report),
        (status = 404, description = "Report not found", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(service))]
pub async fn get_report(
    State(service): State<ReportService>,
    Path(id): Path<String>,
) -> Result<Json<Report>, ErrorResponse> {
    Ok(Json(service.get_report(&id).await?))
}

/// Delete a stored report
#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(service))]
pub async fn delete_report(
    State(service): State<ReportService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ErrorResponse> {
    service.delete_report(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download a stored report as JSON or plain text
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}/export",
    params(
        ("id" = String, Path, description = "Report ID"),
        ExportQueryParams
    ),
    responses(
        (status = 200, description = "Report attachment"),
        (status = 400, description = "Unsupported format", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(service))]
pub async fn export_report(
    State(service): State<ReportService>,
    Path(id): Path<String>,
    Query(params): Query<ExportQueryParams>,
) -> Result<Response, ErrorResponse> {
    let format = match params.format.as_deref() {
        Some(raw) => raw
            .parse::<ExportFormat>()
            .map_err(|e| ErrorResponse::bad_request(&e))?,
        None => ExportFormat::default(),
    };

    let exported = service.export_report(&id, format).await?;
    let disposition = format!("attachment; filename=\"{}\"", header_safe_file_name(&exported.file_name));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, exported.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.body,
    )
        .into_response())
}

/// Replace characters that cannot appear in a quoted header parameter
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe_file_name() {
        assert_eq!(header_safe_file_name("health-report-lab 1.pdf.json"), "health-report-lab 1.pdf.json");
        assert_eq!(header_safe_file_name("a\"b\\c\u{e9}.txt"), "a_b_c_.txt");
    }
}
