use crate::entities::report::{Metric, OverallHealth, Summary};

/// Number of abnormal metric names cited in a summary
const MAX_CONCERNS_CITED: usize = 3;

/// Overall label from abnormal and total counts
///
/// More than half abnormal is `NeedsAttention`, any abnormal is `Monitor`.
pub fn overall_health(abnormal: usize, total: usize) -> OverallHealth {
    if abnormal * 2 > total {
        OverallHealth::NeedsAttention
    } else if abnormal > 0 {
        OverallHealth::Monitor
    } else {
        OverallHealth::Good
    }
}

/// Build the summary for a set of metrics from the named file
pub fn synthesize(metrics: &[Metric], file_name: &str, file_type: &str) -> Summary {
    let abnormal: Vec<&str> = metrics
        .iter()
        .filter(|m| !m.status.is_normal())
        .map(|m| m.name.as_str())
        .collect();
    let health = overall_health(abnormal.len(), metrics.len());

    let closing = if abnormal.is_empty() {
        "All your metrics are within normal ranges.".to_string()
    } else {
        let cited: Vec<&str> = abnormal.iter().take(MAX_CONCERNS_CITED).copied().collect();
        format!("Key areas of concern include {}.", cited.join(", "))
    };

    let text = format!(
        "Based on your {} report \"{}\", your overall health appears to be {}. {} out of {} metrics require attention. {}",
        file_type,
        file_name,
        health.label(),
        abnormal.len(),
        metrics.len(),
        closing
    );

    Summary {
        text,
        overall_health: health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::report::{MetricStatus, MetricValue};

    fn metrics(total: usize, abnormal: usize) -> Vec<Metric> {
        (0..total)
            .map(|i| Metric {
                name: format!("M{}", i),
                value: MetricValue::Number(i as f64),
                unit: "u".to_string(),
                status: if i < abnormal { MetricStatus::Caution } else { MetricStatus::Normal },
                reference_range: String::new(),
                change: None,
                description: None,
            })
            .collect()
    }

    #[test]
    fn test_overall_health_boundaries() {
        for total in [1usize, 2, 4, 7] {
            for abnormal in 0..=total {
                let expected = if abnormal * 2 > total {
                    OverallHealth::NeedsAttention
                } else if abnormal == 0 {
                    OverallHealth::Good
                } else {
                    OverallHealth::Monitor
                };
                let summary = synthesize(&metrics(total, abnormal), "f.pdf", "application/pdf");
                assert_eq!(summary.overall_health, expected, "{} of {}", abnormal, total);
            }
        }

        assert_eq!(overall_health(2, 4), OverallHealth::Monitor);
        assert_eq!(overall_health(3, 4), OverallHealth::NeedsAttention);
        assert_eq!(overall_health(1, 1), OverallHealth::NeedsAttention);
        assert_eq!(overall_health(0, 0), OverallHealth::Good);
    }

    #[test]
    fn test_all_normal_text() {
        let summary = synthesize(&metrics(4, 0), "lab.pdf", "application/pdf");
        assert_eq!(
            summary.text,
            "Based on your application/pdf report \"lab.pdf\", your overall health appears to be good. \
             0 out of 4 metrics require attention. All your metrics are within normal ranges."
        );
    }

    #[test]
    fn test_concerns_cite_at_most_three_names() {
        let summary = synthesize(&metrics(7, 5), "lab.pdf", "application/pdf");
        assert!(summary.text.contains("appears to be needs attention"));
        assert!(summary.text.contains("5 out of 7 metrics require attention"));
        assert!(summary.text.ends_with("Key areas of concern include M0, M1, M2."));
    }
}
