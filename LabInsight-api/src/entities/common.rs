use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use lab_insight_domain::services::ReportServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<ReportServiceError> for ErrorResponse {
    fn from(err: ReportServiceError) -> Self {
        match err {
            ReportServiceError::NotFound(msg) => {
                warn!("{}", msg);
                ErrorResponse::not_found("report")
            }
            ReportServiceError::ValidationError(msg) => {
                warn!("Invalid report request: {}", msg);
                ErrorResponse::validation_error(&msg, None)
            }
            ReportServiceError::RepositoryError(msg) | ReportServiceError::ExportError(msg) => {
                error!("Report service failure: {}", msg);
                ErrorResponse::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ReportServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ReportServiceError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (ReportServiceError::RepositoryError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ReportServiceError::ExportError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ErrorResponse::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = ErrorResponse::from(ReportServiceError::RepositoryError("disk on fire".into()));
        assert_eq!(response.message, "An unexpected error occurred");
    }
}
