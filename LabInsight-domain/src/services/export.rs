use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::report::{RecommendationSet, Report};

/// Downloadable artifact format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

/// A rendered report ready to be saved by the user
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Render a report as a downloadable artifact
pub fn export_report(report: &Report, format: ExportFormat) -> Result<ExportedReport, serde_json::Error> {
    let body = match format {
        ExportFormat::Json => serde_json::to_string_pretty(report)?,
        ExportFormat::Text => render_text(report),
    };

    Ok(ExportedReport {
        file_name: format!("health-report-{}.{}", report.file_name, format.extension()),
        content_type: format.content_type(),
        body,
    })
}

fn write_set(out: &mut String, set: &RecommendationSet) {
    let _ = writeln!(out, "{}", set.title);
    for item in &set.recommendations {
        let _ = writeln!(out, "  - {}", item);
    }
    out.push('\n');
}

/// Human-readable rendering of a report
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Health Report: {}", report.file_name);
    let _ = writeln!(out, "Report ID: {}", report.id);
    let _ = writeln!(out, "Uploaded: {}", report.upload_date.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "File type: {}", report.file_type);
    let _ = writeln!(out, "Category: {}", report.category.display_name());
    out.push('\n');

    let _ = writeln!(out, "Summary ({})", report.summary.overall_health.label());
    let _ = writeln!(out, "{}", report.summary.text);
    out.push('\n');

    let _ = writeln!(out, "Metrics");
    for metric in &report.metrics {
        let _ = write!(
            out,
            "  {}: {} {} [{}] (reference {})",
            metric.name, metric.value, metric.unit, metric.status, metric.reference_range
        );
        if let Some(change) = metric.change {
            let _ = write!(out, " change {:+}", change);
        }
        out.push('\n');
    }
    out.push('\n');

    write_set(&mut out, &report.recommendations);
    if let Some(plan) = &report.dietary_plan {
        write_set(&mut out, plan);
    }

    if let Some(insights) = &report.insights {
        let _ = writeln!(out, "AI Insights");
        for item in &insights.insights {
            let _ = writeln!(out, "  - {}", item);
        }
        if !insights.trends.description.is_empty() {
            let _ = writeln!(out, "Trend: {}", insights.trends.description);
        }
        for concern in &insights.trends.concerns {
            let _ = writeln!(out, "  ! {}", concern);
        }
    }

    out
}
