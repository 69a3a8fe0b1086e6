use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::{body_json, empty_request, json_request, test_app};

#[tokio::test]
async fn test_report_lifecycle() {
    let app = test_app();

    // upload
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            json!({ "fileName": "diabetes-glucose-98.pdf", "fileType": "application/pdf", "size": 1024 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = body_json(response).await;
    let id = report["id"].as_str().unwrap().to_string();
    assert_eq!(report["category"], "diabetes");
    assert_eq!(report["metrics"].as_array().unwrap().len(), 9);
    assert_eq!(report["rawData"]["name"], "diabetes-glucose-98.pdf");
    assert!(report["summary"]["text"].as_str().unwrap().contains("diabetes-glucose-98.pdf"));

    // list
    let response = app.clone().oneshot(empty_request("GET", "/api/v1/reports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id.as_str());

    // get
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/reports/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, report);

    // export
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/reports/{}/export?format=text", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"health-report-diabetes-glucose-98.pdf.txt\""
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8(body.to_vec()).unwrap().starts_with("Health Report: diabetes-glucose-98.pdf"));

    // delete
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/reports/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // gone
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/reports/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");

    let response = app
        .oneshot(empty_request("DELETE", &format!("/api/v1/reports/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_json_export_is_the_report() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/reports", json!({ "fileName": "renal.pdf", "fileType": "" })))
        .await
        .unwrap();
    let report = body_json(response).await;

    let response = app
        .oneshot(empty_request("GET", &format!("/api/v1/reports/{}/export", report["id"].as_str().unwrap())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_json(response).await, report);
}

#[tokio::test]
async fn test_upload_rejects_invalid_id() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            json!({ "fileName": "heart.pdf", "fileType": "application/pdf", "id": "abc-123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn test_upload_rejects_overlong_file_name() {
    let response = test_app()
        .oneshot(json_request("POST", "/api/v1/reports", json!({ "fileName": "x".repeat(2000) })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_unknown_format() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/reports", json!({ "fileName": "tsh.pdf" })))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(empty_request("GET", &format!("/api/v1/reports/{}/export?format=pdf", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_profile_endpoint() {
    let app = test_app();

    let response = app.clone().oneshot(empty_request("GET", "/api/v1/categories/heart")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["displayName"], "Heart Health");
    assert_eq!(profile["distribution"].as_array().unwrap().len(), 31);

    let response = app.oneshot(empty_request("GET", "/api/v1/categories/lungs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_with_report_text() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            json!({
                "fileName": "scan-0042.pdf",
                "fileType": "application/pdf",
                "content": "Creatinine: 1.9 mg/dL\neGFR: 48 mL/min"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let report = body_json(response).await;
    assert_eq!(report["category"], "kidney");
    assert_eq!(report["metrics"].as_array().unwrap().len(), 2);
    assert_eq!(report["metrics"][0]["name"], "Creatinine");
    assert_eq!(report["metrics"][0]["value"], 1.9);
    assert_eq!(report["metrics"][0]["status"], "caution");
    assert_eq!(report["rawData"]["content"], "Creatinine: 1.9 mg/dL\neGFR: 48 mL/min");
}
