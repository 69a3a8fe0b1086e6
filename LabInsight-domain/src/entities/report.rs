use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Classification of a single metric against its reference range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    /// Within the reference range
    Normal,

    /// Slightly outside the range, worth watching
    #[serde(alias = "warning")]
    Caution,

    /// Clearly outside the range
    #[serde(alias = "alert")]
    Attention,
}

impl MetricStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricStatus::Normal => "normal",
            MetricStatus::Caution => "caution",
            MetricStatus::Attention => "attention",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, MetricStatus::Normal)
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(MetricStatus::Normal),
            "caution" | "warning" => Ok(MetricStatus::Caution),
            "attention" | "alert" => Ok(MetricStatus::Attention),
            other => Err(format!("Invalid metric status: {}", other)),
        }
    }
}

/// Metric value: a number, or an opaque display string for composite
/// readings such as blood pressure ("120/80")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// A single named, valued health measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Metric name, unique within a report
    pub name: String,

    pub value: MetricValue,

    pub unit: String,

    pub status: MetricStatus,

    /// Human readable reference range, e.g. "70-100 mg/dL"
    pub reference_range: String,

    /// Delta against the prior baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body-system category used to pick metrics and recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Diabetes,
    Heart,
    Kidney,
    Thyroid,
    Liver,
    General,
}

impl Category {
    /// Every category, in classifier priority order
    pub const ALL: [Category; 6] = [
        Category::Diabetes,
        Category::Heart,
        Category::Kidney,
        Category::Thyroid,
        Category::Liver,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Diabetes => "diabetes",
            Category::Heart => "heart",
            Category::Kidney => "kidney",
            Category::Thyroid => "thyroid",
            Category::Liver => "liver",
            Category::General => "general",
        }
    }

    /// Name shown on category detail views
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Diabetes => "Diabetes",
            Category::Heart => "Heart Health",
            Category::Kidney => "Kidney Health",
            Category::Thyroid => "Thyroid Health",
            Category::Liver => "Liver Health",
            Category::General => "Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse: unknown names fall back to `General`
impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "diabetes" => Category::Diabetes,
            "heart" => Category::Heart,
            "kidney" => Category::Kidney,
            "thyroid" => Category::Thyroid,
            "liver" => Category::Liver,
            _ => Category::General,
        }
    }
}

/// Titled, ordered list of unique recommendation strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RecommendationSet {
    pub title: String,
    pub recommendations: Vec<String>,
}

/// Overall health label derived from the share of abnormal metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum OverallHealth {
    Good,
    Monitor,
    #[serde(alias = "needs attention")]
    NeedsAttention,
}

impl OverallHealth {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallHealth::Good => "good",
            OverallHealth::Monitor => "monitor",
            OverallHealth::NeedsAttention => "needs-attention",
        }
    }

    /// Label used inside summary sentences
    pub fn label(&self) -> &'static str {
        match self {
            OverallHealth::Good => "good",
            OverallHealth::Monitor => "monitor",
            OverallHealth::NeedsAttention => "needs attention",
        }
    }
}

impl FromStr for OverallHealth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(OverallHealth::Good),
            "monitor" => Ok(OverallHealth::Monitor),
            "needs-attention" | "needs attention" => Ok(OverallHealth::NeedsAttention),
            other => Err(format!("Invalid overall health label: {}", other)),
        }
    }
}

/// Natural-language summary of a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub text: String,
    pub overall_health: OverallHealth,
}

/// Metadata of the uploaded artifact, stored verbatim as `rawData`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,

    /// Declared MIME type
    #[serde(rename = "type", default)]
    pub file_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,

    /// Text of the report when the client extracted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_type: file_type.into(),
            size: None,
            last_modified: None,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Report text, if any non-blank text was supplied
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Trend commentary returned by the insight provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Trends {
    pub description: String,
    pub concerns: Vec<String>,
}

/// Insights attached to a report when the external provider succeeded
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AiInsights {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub trends: Trends,
}

/// An analysed lab report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// UUID v4 string
    pub id: String,

    pub file_name: String,

    pub file_type: String,

    pub upload_date: DateTime<Utc>,

    pub category: Category,

    pub metrics: Vec<Metric>,

    pub summary: Summary,

    /// Lifestyle recommendations
    pub recommendations: RecommendationSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_plan: Option<RecommendationSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<AiInsights>,

    pub raw_data: UploadedFile,
}

impl Report {
    /// Metrics whose status is not normal, in report order
    pub fn abnormal_metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter().filter(|m| !m.status.is_normal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accepts_legacy_spellings() {
        let statuses: Vec<MetricStatus> =
            serde_json::from_str(r#"["normal", "warning", "caution", "alert", "attention"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![
                MetricStatus::Normal,
                MetricStatus::Caution,
                MetricStatus::Caution,
                MetricStatus::Attention,
                MetricStatus::Attention,
            ]
        );
        assert_eq!(serde_json::to_string(&MetricStatus::Caution).unwrap(), "\"caution\"");
        assert!("critical".parse::<MetricStatus>().is_err());
    }

    #[test]
    fn test_metric_value_is_untagged() {
        let number: MetricValue = serde_json::from_str("98").unwrap();
        let text: MetricValue = serde_json::from_str("\"120/80\"").unwrap();
        assert_eq!(number, MetricValue::Number(98.0));
        assert_eq!(text, MetricValue::Text("120/80".to_string()));
        assert_eq!(number.to_string(), "98");
        assert_eq!(MetricValue::Number(5.4).to_string(), "5.4");
    }

    #[test]
    fn test_unknown_category_is_general() {
        assert_eq!(Category::from("Thyroid"), Category::Thyroid);
        assert_eq!(Category::from("lungs"), Category::General);
        assert_eq!(Category::from(""), Category::General);
    }

    #[test]
    fn test_overall_health_wire_and_label() {
        assert_eq!(
            serde_json::to_string(&OverallHealth::NeedsAttention).unwrap(),
            "\"needs-attention\""
        );
        let legacy: OverallHealth = serde_json::from_str("\"needs attention\"").unwrap();
        assert_eq!(legacy, OverallHealth::NeedsAttention);
        assert_eq!(OverallHealth::NeedsAttention.label(), "needs attention");
    }

    #[test]
    fn test_uploaded_file_uses_type_key() {
        let file = UploadedFile::new("lipid.pdf", "application/pdf");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "application/pdf");
        assert!(json.get("size").is_none());
    }
}
