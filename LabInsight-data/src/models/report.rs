use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Storage model for a single valued metric
///
/// Status is kept as the raw string so that records written by older
/// clients (`warning`, `alert`) still load; the domain layer interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMetric {
    /// Metric name, unique within a report
    pub name: String,

    /// Numeric value or opaque display string (e.g. "120/80")
    pub value: serde_json::Value,

    /// Unit of measurement
    pub unit: String,

    /// Status classification as written by the producer
    pub status: String,

    /// Human-readable reference range
    pub reference_range: String,

    /// Delta against the previous baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,

    /// Optional description of what the metric measures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Storage model for the report summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSummary {
    pub text: String,
    pub overall_health: String,
}

/// Storage model for a titled list of recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecommendationSet {
    pub title: String,
    pub recommendations: Vec<String>,
}

/// Storage model for trends reported by the external analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrends {
    pub description: String,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// Storage model for insights reported by the external analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredInsights {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub trends: StoredTrends,
}

/// Storage model for a complete analysed report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    /// Unique identifier for the report
    pub id: String,

    /// Name of the uploaded file
    pub file_name: String,

    /// Declared type of the uploaded file
    pub file_type: String,

    /// When the report was analysed
    pub upload_date: DateTime<Utc>,

    /// Body-system category chosen for the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Valued metrics
    pub metrics: Vec<StoredMetric>,

    /// Overall summary
    pub summary: StoredSummary,

    /// Lifestyle recommendations
    pub recommendations: StoredRecommendationSet,

    /// Dietary recommendations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_plan: Option<StoredRecommendationSet>,

    /// Insights from the external analysis service, when it answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<StoredInsights>,

    /// Opaque upload metadata
    #[serde(default)]
    pub raw_data: serde_json::Value,
}
