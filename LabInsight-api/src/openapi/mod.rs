use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Report endpoints
        crate::api::handlers::reports::upload_report,
        crate::api::handlers::reports::list_reports,
        crate::api::handlers::reports::get_report,
        crate::api::handlers::reports::delete_report,
        crate::api::handlers::reports::export_report,

        // Category endpoints
        crate::api::handlers::categories::get_category_profile
    ),
    components(
        schemas(
            // Request and error entities
            crate::entities::report::UploadReportRequest,
            crate::entities::report::ExportQueryParams,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain report model
            lab_insight_domain::entities::Report,
            lab_insight_domain::entities::UploadedFile,
            lab_insight_domain::entities::Metric,
            lab_insight_domain::entities::MetricValue,
            lab_insight_domain::entities::MetricStatus,
            lab_insight_domain::entities::Category,
            lab_insight_domain::entities::Summary,
            lab_insight_domain::entities::OverallHealth,
            lab_insight_domain::entities::RecommendationSet,
            lab_insight_domain::entities::AiInsights,
            lab_insight_domain::entities::Trends,

            // Category profiles
            lab_insight_domain::entities::CategoryProfile,
            lab_insight_domain::entities::BellCurvePoint,
            lab_insight_domain::entities::BellCurveParams,
            lab_insight_domain::entities::TrendPoint,
            lab_insight_domain::entities::RangePosition
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "reports", description = "Lab report upload, analysis and export"),
        (name = "categories", description = "Per-category reference data")
    ),
    info(
        title = "LabInsight API",
        version = "0.1.0",
        description = "API for analysing lab reports and deriving health recommendations",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "LabInsight API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "reports"));
        assert!(tags.iter().any(|tag| tag.name == "categories"));

        for path in [
            "/health",
            "/api/v1/reports",
            "/api/v1/reports/{id}",
            "/api/v1/reports/{id}/export",
            "/api/v1/categories/{category}",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }

        let schemas = &openapi.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("Report"));
        assert!(schemas.contains_key("CategoryProfile"));
    }
}
