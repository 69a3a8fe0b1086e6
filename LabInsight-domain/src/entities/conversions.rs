use lab_insight_data::models::report::{
    StoredInsights, StoredMetric, StoredRecommendationSet, StoredReport, StoredSummary, StoredTrends,
};
use uuid::Uuid;

use crate::entities::report::{
    AiInsights, Category, Metric, MetricStatus, MetricValue, OverallHealth, RecommendationSet,
    Report, Summary, Trends, UploadedFile,
};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Helper function to safely parse a string ID to UUID
///
/// When an invalid UUID is provided, it returns a descriptive error message.
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert a domain metric value into its JSON representation
pub fn convert_to_data_value(value: &MetricValue) -> serde_json::Value {
    match value {
        MetricValue::Number(n) => serde_json::Value::from(*n),
        MetricValue::Text(s) => serde_json::Value::String(s.clone()),
    }
}

/// Convert a stored JSON value into a domain metric value
///
/// Numeric strings stay text: they are display values, not measurements.
pub fn convert_to_domain_value(value: serde_json::Value) -> MetricValue {
    match value {
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => MetricValue::Number(f),
            None => MetricValue::Text(n.to_string()),
        },
        serde_json::Value::String(s) => MetricValue::Text(s),
        other => MetricValue::Text(other.to_string()),
    }
}

/// Convert from domain entity to data model for a metric
pub fn convert_to_data_metric(metric: &Metric) -> StoredMetric {
    StoredMetric {
        name: metric.name.clone(),
        value: convert_to_data_value(&metric.value),
        unit: metric.unit.clone(),
        status: metric.status.as_str().to_string(),
        reference_range: metric.reference_range.clone(),
        change: metric.change,
        description: metric.description.clone(),
    }
}

/// Convert from data model to domain entity for a metric
pub fn convert_to_domain_metric(data_metric: StoredMetric) -> Result<Metric, String> {
    let status = data_metric.status.parse::<MetricStatus>()?;

    Ok(Metric {
        name: data_metric.name,
        value: convert_to_domain_value(data_metric.value),
        unit: data_metric.unit,
        status,
        reference_range: data_metric.reference_range,
        change: data_metric.change,
        description: data_metric.description,
    })
}

fn convert_to_data_recommendations(set: &RecommendationSet) -> StoredRecommendationSet {
    StoredRecommendationSet {
        title: set.title.clone(),
        recommendations: set.recommendations.clone(),
    }
}

fn convert_to_domain_recommendations(set: StoredRecommendationSet) -> RecommendationSet {
    RecommendationSet {
        title: set.title,
        recommendations: set.recommendations,
    }
}

fn convert_to_data_insights(insights: &AiInsights) -> StoredInsights {
    StoredInsights {
        insights: insights.insights.clone(),
        recommendations: insights.recommendations.clone(),
        trends: StoredTrends {
            description: insights.trends.description.clone(),
            concerns: insights.trends.concerns.clone(),
        },
    }
}

fn convert_to_domain_insights(insights: StoredInsights) -> AiInsights {
    AiInsights {
        insights: insights.insights,
        recommendations: insights.recommendations,
        trends: Trends {
            description: insights.trends.description,
            concerns: insights.trends.concerns,
        },
    }
}

/// Convert from domain entity to data model for a whole report
pub fn convert_to_data_report(report: &Report) -> StoredReport {
    StoredReport {
        id: report.id.clone(),
        file_name: report.file_name.clone(),
        file_type: report.file_type.clone(),
        upload_date: report.upload_date,
        category: Some(report.category.as_str().to_string()),
        metrics: report.metrics.iter().map(convert_to_data_metric).collect(),
        summary: StoredSummary {
            text: report.summary.text.clone(),
            overall_health: report.summary.overall_health.as_str().to_string(),
        },
        recommendations: convert_to_data_recommendations(&report.recommendations),
        dietary_plan: report.dietary_plan.as_ref().map(convert_to_data_recommendations),
        insights: report.insights.as_ref().map(convert_to_data_insights),
        raw_data: serde_json::to_value(&report.raw_data).unwrap_or(serde_json::Value::Null),
    }
}

/// Convert from data model to domain entity for a whole report
///
/// Reports written before categories were stored default to `general`; a raw
/// payload that is not an uploaded-file record is rebuilt from the report's
/// own file name and type.
pub fn convert_to_domain_report(data_report: StoredReport) -> Result<Report, String> {
    let metrics = data_report
        .metrics
        .into_iter()
        .map(convert_to_domain_metric)
        .collect::<Result<Vec<_>, _>>()?;

    let overall_health = data_report.summary.overall_health.parse::<OverallHealth>()?;

    let raw_data = serde_json::from_value::<UploadedFile>(data_report.raw_data)
        .unwrap_or_else(|_| UploadedFile::new(data_report.file_name.clone(), data_report.file_type.clone()));

    Ok(Report {
        id: data_report.id,
        file_name: data_report.file_name,
        file_type: data_report.file_type,
        upload_date: data_report.upload_date,
        category: data_report
            .category
            .as_deref()
            .map(Category::from)
            .unwrap_or(Category::General),
        metrics,
        summary: Summary {
            text: data_report.summary.text,
            overall_health,
        },
        recommendations: convert_to_domain_recommendations(data_report.recommendations),
        dietary_plan: data_report.dietary_plan.map(convert_to_domain_recommendations),
        insights: data_report.insights.map(convert_to_domain_insights),
        raw_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_report() -> Report {
        Report {
            id: "123e4567-e89b-42d3-a456-426614174000".to_string(),
            file_name: "thyroid-panel.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            upload_date: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
            category: Category::Thyroid,
            metrics: vec![
                Metric {
                    name: "TSH".to_string(),
                    value: MetricValue::Number(2.35),
                    unit: "mIU/L".to_string(),
                    status: MetricStatus::Attention,
                    reference_range: "0.4-4.0 mIU/L".to_string(),
                    change: Some(-0.12),
                    description: Some("Thyroid Stimulating Hormone".to_string()),
                },
                Metric {
                    name: "Blood Pressure".to_string(),
                    value: MetricValue::Text("128/84".to_string()),
                    unit: "mmHg".to_string(),
                    status: MetricStatus::Normal,
                    reference_range: "120/80 mmHg".to_string(),
                    change: None,
                    description: None,
                },
            ],
            summary: Summary {
                text: "summary".to_string(),
                overall_health: OverallHealth::NeedsAttention,
            },
            recommendations: RecommendationSet {
                title: "Thyroid Health Recommendations".to_string(),
                recommendations: vec!["Ensure adequate iodine in your diet".to_string()],
            },
            dietary_plan: None,
            insights: Some(AiInsights {
                insights: vec!["TSH slightly elevated".to_string()],
                recommendations: vec![],
                trends: Trends::default(),
            }),
            raw_data: UploadedFile::new("thyroid-panel.pdf", "application/pdf"),
        }
    }

    #[test]
    fn test_report_survives_data_layer() {
        let report = sample_report();
        let stored = convert_to_data_report(&report);

        assert_eq!(stored.category.as_deref(), Some("thyroid"));
        assert_eq!(stored.summary.overall_health, "needs-attention");
        assert_eq!(stored.metrics[0].status, "attention");
        assert_eq!(stored.raw_data["type"], "application/pdf");

        let restored = convert_to_domain_report(stored).unwrap();
        assert_eq!(restored, report);
    }

    #[test]
    fn test_legacy_stored_report_is_accepted() {
        let mut stored = convert_to_data_report(&sample_report());
        stored.category = None;
        stored.summary.overall_health = "needs attention".to_string();
        stored.metrics[0].status = "alert".to_string();
        stored.raw_data = serde_json::json!("opaque");

        let restored = convert_to_domain_report(stored).unwrap();
        assert_eq!(restored.category, Category::General);
        assert_eq!(restored.summary.overall_health, OverallHealth::NeedsAttention);
        assert_eq!(restored.metrics[0].status, MetricStatus::Attention);
        assert_eq!(restored.raw_data.name, "thyroid-panel.pdf");
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let mut stored = convert_to_data_report(&sample_report());
        stored.metrics[0].status = "critical".to_string();

        assert!(convert_to_domain_report(stored).is_err());
    }

    #[test]
    fn test_parse_string_to_uuid() {
        assert!(parse_string_to_uuid("123e4567-e89b-42d3-a456-426614174000").is_ok());
        assert!(parse_string_to_uuid("abc-123").unwrap_err().contains("Invalid UUID"));
    }
}
