use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use lab_insight_domain::entities::UploadedFile;

/// Request payload describing an uploaded lab report file
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadReportRequest {
    /// Original file name; keywords and numbers in it drive the analysis
    #[validate(length(max = 1024, message = "File name cannot exceed 1024 characters"))]
    pub file_name: String,

    /// MIME type reported by the browser, may be empty
    #[serde(default)]
    #[validate(length(max = 255, message = "File type cannot exceed 255 characters"))]
    pub file_type: String,

    /// File size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Last modification time in epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,

    /// Plain text of the report, when the client could extract it.
    /// Values found in it replace the file-name heuristics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200000, message = "Report content cannot exceed 200000 characters"))]
    pub content: Option<String>,

    /// Caller-chosen report id (UUID). Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl UploadReportRequest {
    /// Split the request into the uploaded file descriptor and the requested id
    pub fn into_parts(self) -> (UploadedFile, Option<String>) {
        let file = UploadedFile {
            name: self.file_name,
            file_type: self.file_type,
            size: self.size,
            last_modified: self.last_modified,
            content: self.content,
        };
        (file, self.id)
    }
}

/// Query parameters for exporting a report
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ExportQueryParams {
    /// `json` (default) or `text`
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_browser_file_shape() {
        let request: UploadReportRequest = serde_json::from_value(serde_json::json!({
            "fileName": "thyroid.pdf",
            "fileType": "application/pdf",
            "size": 2048,
            "lastModified": 1700000000000i64
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        let (file, id) = request.into_parts();
        assert_eq!(file.name, "thyroid.pdf");
        assert_eq!(file.size, Some(2048));
        assert!(id.is_none());
    }

    #[test]
    fn test_overlong_file_name_is_rejected() {
        let request = UploadReportRequest {
            file_name: "a".repeat(1025),
            file_type: String::new(),
            size: None,
            last_modified: None,
            content: None,
            id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_content_is_carried_and_bounded() {
        let request: UploadReportRequest = serde_json::from_value(serde_json::json!({
            "fileName": "panel.pdf",
            "content": "Glucose: 182 mg/dL"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        let (file, _) = request.clone().into_parts();
        assert_eq!(file.content.as_deref(), Some("Glucose: 182 mg/dL"));

        let oversized = UploadReportRequest {
            content: Some("x".repeat(200_001)),
            ..request
        };
        assert!(oversized.validate().is_err());
    }
}
