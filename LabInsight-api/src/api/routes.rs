use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use lab_insight_domain::health::HealthService as DomainHealthService;
use lab_insight_domain::services::create_default_report_service;

use crate::api::handlers::health::HealthService;
use crate::api::handlers::reports::ReportService;
use crate::api::handlers::{categories, health, reports};
use crate::openapi::configure_swagger_routes;

/// Create the application router from environment configuration
pub async fn create_app() -> Router {
    debug!("Creating application router");

    let report_service = create_default_report_service().await;
    let health_service: HealthService = Arc::new(DomainHealthService::new(
        Arc::clone(report_service.repository().store()),
        report_service.insight_provider(),
    ));

    create_router(Arc::new(report_service), health_service)
}

/// Build the router around already constructed services
pub fn create_router(report_service: ReportService, health_service: HealthService) -> Router {
    let api_routes = Router::new()
        .route("/reports", get(reports::list_reports).post(reports::upload_report))
        .route("/reports/:id", get(reports::get_report).delete(reports::delete_report))
        .route("/reports/:id/export", get(reports::export_report))
        .route("/categories/:category", get(categories::get_category_profile))
        .with_state(report_service);

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .merge(configure_swagger_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    debug!("Router assembled with Swagger UI at /api-docs");

    app
}
