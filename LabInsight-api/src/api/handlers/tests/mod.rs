mod reports_test;

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};

use lab_insight_data::repository::ReportRepository;
use lab_insight_domain::services::ReportService;
use lab_insight_domain::testing::MockHealthService;

use crate::api::routes::create_router;

/// Router backed by a seeded in-memory report service and a healthy mock health service
pub fn test_app() -> Router {
    let service = ReportService::new(ReportRepository::in_memory()).with_seed(7);
    create_router(Arc::new(service), Arc::new(MockHealthService::new()))
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}
