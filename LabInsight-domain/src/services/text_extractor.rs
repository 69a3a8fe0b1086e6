//! Metric extraction from report text
//!
//! Uploads that carry the report's text are scanned with one pattern per
//! catalog metric (`Glucose: 182 mg/dL`, `HbA1c - 6.1`, `BP 130/85`). Values
//! are taken as written in the catalog unit and judged against the catalog
//! reference range. Uploads without text, or whose text names no known metric,
//! fall back to the file-name heuristics.

use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;
use tracing::debug;

use crate::entities::report::{Category, Metric, MetricStatus, MetricValue, UploadedFile};
use crate::services::catalog::{self, MetricDefinition};
use crate::services::generator::{FilenameHeuristicExtractor, ReportExtractor};

const SEPARATOR: &str = r"\s*(?:[:=\-]\s*)?";
const NUMBER: &str = r"(\d+(?:\.\d+)?)";

/// Catalog metric name, alias alternation, and words that must not directly
/// precede a match (`hdl cholesterol` is not total cholesterol)
const METRIC_ALIASES: &[(&str, &str, &[&str])] = &[
    ("Blood Glucose", r"fasting\s+glucose|glucose|blood\s+sugar", &[]),
    ("Total Cholesterol", r"total\s+cholesterol|cholesterol", &["hdl", "ldl"]),
    ("Hemoglobin", r"hemoglobin|haemoglobin|hgb|hb", &["glycated"]),
    ("Vitamin D", r"vitamin\s*d3?|25-oh\s+vitamin\s+d", &[]),
    ("Vitamin B12", r"vitamin\s*b12|b12|cobalamin", &[]),
    ("HbA1c", r"hba1c|hb\s*a1c|a1c|glycated\s+ha?emoglobin", &[]),
    ("Insulin", r"insulin", &[]),
    ("C-Peptide", r"c-peptide|c\s+peptide", &[]),
    ("LDL Cholesterol", r"ldl(?:-c)?(?:\s+cholesterol)?|low\s+density\s+lipoprotein", &[]),
    ("HDL Cholesterol", r"hdl(?:-c)?(?:\s+cholesterol)?|high\s+density\s+lipoprotein", &[]),
    ("Triglycerides", r"triglycerides|tg", &[]),
    ("Creatinine", r"creatinine|creat", &[]),
    ("BUN", r"bun|blood\s+urea\s+nitrogen", &[]),
    ("eGFR", r"egfr|estimated\s+glomerular\s+filtration\s+rate", &[]),
    ("TSH", r"tsh|thyroid\s+stimulating\s+hormone", &[]),
    ("T4", r"free\s+t4|t4|thyroxine", &[]),
    ("T3", r"free\s+t3|t3|triiodothyronine", &[]),
    ("ALT", r"alt|alanine\s+aminotransferase|sgpt", &[]),
    ("AST", r"ast|aspartate\s+aminotransferase|sgot", &[]),
    ("Albumin", r"albumin", &[]),
];

struct TextPattern {
    definition: &'static MetricDefinition,
    regex: Regex,
    excluded_prefixes: &'static [&'static str],
}

static TEXT_PATTERNS: Lazy<Vec<TextPattern>> = Lazy::new(|| {
    METRIC_ALIASES
        .iter()
        .filter_map(|&(name, aliases, excluded_prefixes)| {
            let definition = catalog::find_definition(name)?;
            let regex = Regex::new(&format!(r"\b(?:{}){}{}", aliases, SEPARATOR, NUMBER)).ok()?;
            Some(TextPattern {
                definition,
                regex,
                excluded_prefixes,
            })
        })
        .collect()
});

static BLOOD_PRESSURE_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:blood\s+pressure|bp){}(\d{{2,3}})\s*/\s*(\d{{2,3}})", SEPARATOR)).ok()
});

/// Status of a numeric value against the definition's reference range
///
/// Ranges that cannot be parsed leave the value normal.
pub fn status_for(def: &MetricDefinition, value: f64) -> MetricStatus {
    match catalog::reference_bounds(def.reference_range) {
        Some(bounds) if !bounds.contains(value) => def.abnormal_status,
        _ => MetricStatus::Normal,
    }
}

/// Blood pressure is abnormal when either reading exceeds the `S/D` reference
fn blood_pressure_status(def: &MetricDefinition, systolic: f64, diastolic: f64) -> MetricStatus {
    let limits = def
        .reference_range
        .split_whitespace()
        .next()
        .and_then(|pair| pair.split_once('/'))
        .and_then(|(s, d)| Some((s.parse::<f64>().ok()?, d.parse::<f64>().ok()?)));

    match limits {
        Some((max_s, max_d)) if systolic > max_s || diastolic > max_d => def.abnormal_status,
        _ => MetricStatus::Normal,
    }
}

fn text_metric(def: &MetricDefinition, value: MetricValue, status: MetricStatus) -> Metric {
    Metric {
        name: def.name.to_string(),
        value,
        unit: def.unit.to_string(),
        status,
        reference_range: def.reference_range.to_string(),
        change: None,
        description: Some(def.description.to_string()),
    }
}

fn find_value(pattern: &TextPattern, text: &str) -> Option<f64> {
    pattern
        .regex
        .captures_iter(text)
        .filter(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let before = text[..start].trim_end();
            !pattern.excluded_prefixes.iter().any(|p| before.ends_with(p))
        })
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|v| v.is_finite())
}

fn find_blood_pressure(text: &str) -> Option<Metric> {
    let def = catalog::find_definition("Blood Pressure")?;
    let caps = BLOOD_PRESSURE_RE.as_ref()?.captures(text)?;
    let systolic = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let diastolic = caps.get(2)?.as_str().parse::<f64>().ok()?;

    Some(text_metric(
        def,
        MetricValue::Text(format!("{}/{}", systolic, diastolic)),
        blood_pressure_status(def, systolic, diastolic),
    ))
}

/// Every catalog metric named in `text`, first occurrence each, in catalog order
pub fn extract_text_metrics(text: &str) -> Vec<Metric> {
    let lower = text.to_lowercase();
    let mut metrics: Vec<Metric> = TEXT_PATTERNS
        .iter()
        .filter_map(|pattern| {
            let value = find_value(pattern, &lower)?;
            Some(text_metric(
                pattern.definition,
                MetricValue::Number(value),
                status_for(pattern.definition, value),
            ))
        })
        .collect();

    // Blood pressure sits third in the base set
    if let Some(bp) = find_blood_pressure(&lower) {
        let at = metrics
            .iter()
            .position(|m| m.name != "Blood Glucose" && m.name != "Total Cholesterol")
            .unwrap_or(metrics.len());
        metrics.insert(at, bp);
    }

    metrics
}

/// Reads values from the report text, falling back to file-name heuristics
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPatternExtractor {
    fallback: FilenameHeuristicExtractor,
}

impl ReportExtractor for TextPatternExtractor {
    fn extract(&self, file: &UploadedFile, category: Category, rng: &mut dyn RngCore) -> Vec<Metric> {
        if let Some(text) = file.text() {
            let metrics = extract_text_metrics(text);
            if !metrics.is_empty() {
                debug!("Read {} metrics from the text of {}", metrics.len(), file.name);
                return metrics;
            }
            debug!("No known metric in the text of {}, using file-name heuristics", file.name);
        }
        self.fallback.extract(file, category, rng)
    }

    fn name(&self) -> &'static str {
        "text-pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generator::generate_metrics;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn find<'a>(metrics: &'a [Metric], name: &str) -> Option<&'a Metric> {
        metrics.iter().find(|m| m.name == name)
    }

    const PANEL: &str = "COMPREHENSIVE PANEL\n\
        Fasting Glucose: 182 mg/dL\n\
        Total Cholesterol: 190 mg/dL\n\
        HDL Cholesterol: 38 mg/dL\n\
        LDL-C: 130 mg/dL\n\
        Triglycerides - 140 mg/dL\n\
        HbA1c 7.2 %\n\
        Blood Pressure: 128/84 mmHg\n\
        TSH = 2.1 mIU/L";

    #[test]
    fn test_panel_values_and_statuses() {
        let metrics = extract_text_metrics(PANEL);

        let glucose = find(&metrics, "Blood Glucose").unwrap();
        assert_eq!(glucose.value, MetricValue::Number(182.0));
        assert_eq!(glucose.status, MetricStatus::Attention);
        assert_eq!(glucose.unit, "mg/dL");
        assert_eq!(glucose.change, None);

        let total = find(&metrics, "Total Cholesterol").unwrap();
        assert_eq!(total.value, MetricValue::Number(190.0));
        assert!(total.status.is_normal());

        assert_eq!(find(&metrics, "HDL Cholesterol").unwrap().status, MetricStatus::Attention);
        assert_eq!(find(&metrics, "LDL Cholesterol").unwrap().status, MetricStatus::Caution);
        assert!(find(&metrics, "Triglycerides").unwrap().status.is_normal());
        assert_eq!(find(&metrics, "HbA1c").unwrap().value, MetricValue::Number(7.2));
        assert!(find(&metrics, "TSH").unwrap().status.is_normal());

        let bp = find(&metrics, "Blood Pressure").unwrap();
        assert_eq!(bp.value, MetricValue::Text("128/84".to_string()));
        assert_eq!(bp.status, MetricStatus::Attention);

        // HbA1c's "glycated"/"hb" wording must not be read as hemoglobin
        assert!(find(&metrics, "Hemoglobin").is_none());
    }

    #[test]
    fn test_catalog_order_with_blood_pressure_third() {
        let names: Vec<String> = extract_text_metrics(PANEL).into_iter().map(|m| m.name).collect();
        assert_eq!(&names[..3], ["Blood Glucose", "Total Cholesterol", "Blood Pressure"]);
    }

    #[test]
    fn test_hdl_line_is_not_total_cholesterol() {
        let metrics = extract_text_metrics("HDL cholesterol: 62");
        assert!(find(&metrics, "Total Cholesterol").is_none());
        assert_eq!(find(&metrics, "HDL Cholesterol").unwrap().value, MetricValue::Number(62.0));
    }

    #[test]
    fn test_glycated_hemoglobin_is_hba1c() {
        let metrics = extract_text_metrics("Glycated hemoglobin: 5.4\nHemoglobin: 11.2 g/dL");
        assert_eq!(find(&metrics, "HbA1c").unwrap().value, MetricValue::Number(5.4));
        let hb = find(&metrics, "Hemoglobin").unwrap();
        assert_eq!(hb.value, MetricValue::Number(11.2));
        assert_eq!(hb.status, MetricStatus::Caution);
    }

    #[test]
    fn test_short_aliases_need_word_boundaries() {
        assert!(extract_text_metrics("Patient is in good health, salt 40, past 3 months").is_empty());
        let metrics = extract_text_metrics("ALT: 72 U/L, AST: 20 U/L");
        assert_eq!(find(&metrics, "ALT").unwrap().status, MetricStatus::Caution);
        assert!(find(&metrics, "AST").unwrap().status.is_normal());
    }

    #[test]
    fn test_status_for_one_sided_ranges() {
        let egfr = catalog::find_definition("eGFR").unwrap();
        assert!(status_for(egfr, 75.0).is_normal());
        assert_eq!(status_for(egfr, 45.0), egfr.abnormal_status);

        let bp = catalog::find_definition("Blood Pressure").unwrap();
        assert!(blood_pressure_status(bp, 120.0, 80.0).is_normal());
        assert_eq!(blood_pressure_status(bp, 118.0, 92.0), bp.abnormal_status);
    }

    #[test]
    fn test_extractor_reads_text_without_drawing() {
        let file = UploadedFile::new("random.pdf", "application/pdf").with_content("Creatinine 1.6 mg/dL");
        let mut rng = StdRng::seed_from_u64(4);
        let metrics = TextPatternExtractor::default().extract(&file, Category::Kidney, &mut rng);

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "Creatinine");
        assert_eq!(metrics[0].status, MetricStatus::Caution);
    }

    #[test]
    fn test_extractor_falls_back_without_matches() {
        let mut with_text = StdRng::seed_from_u64(8);
        let mut expected = StdRng::seed_from_u64(8);

        let file = UploadedFile::new("glucose-98.pdf", "application/pdf").with_content("Results pending");
        let metrics = TextPatternExtractor::default().extract(&file, Category::Diabetes, &mut with_text);
        assert_eq!(metrics, generate_metrics(Category::Diabetes, Some("glucose-98.pdf"), &mut expected));

        let blank = UploadedFile::new("glucose-98.pdf", "application/pdf").with_content("   ");
        let mut a = StdRng::seed_from_u64(8);
        let mut b = StdRng::seed_from_u64(8);
        assert_eq!(
            TextPatternExtractor::default().extract(&blank, Category::Diabetes, &mut a),
            generate_metrics(Category::Diabetes, Some("glucose-98.pdf"), &mut b)
        );
    }

    #[test]
    fn test_overlong_number_is_skipped() {
        let text = format!("Glucose: {}", "9".repeat(400));
        assert!(extract_text_metrics(&text).is_empty());
    }
}
