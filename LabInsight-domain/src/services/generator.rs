//! Synthetic metric generation
//!
//! No document parsing happens here: values are drawn from bounded per-metric
//! distributions, optionally seeded by numbers written next to a metric keyword
//! in the file name (`glucose-98.pdf`). `ReportExtractor` is the seam where a
//! real parser can replace this mock extraction.

use once_cell::sync::Lazy;
use rand::{Rng, RngCore};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use crate::entities::report::{Category, Metric, MetricStatus, MetricValue, UploadedFile};
use crate::services::catalog::{self, ChangeRange, MetricDefinition, ValueRange};

/// Relative jitter applied to a seeded value
pub const SEED_JITTER: f64 = 0.05;

/// Largest number accepted as a seed; anything above is treated as no match
pub const MAX_SEED: f64 = 1_000_000.0;

const SEPARATOR: &str = r"[\s_\-=:]*";
const NUMBER: &str = r"(\d+(?:\.\d+)?)";

/// Forward (`keyword-98`) and backward (`98-keyword`) patterns per keyword
struct SeedPatterns {
    forward: Regex,
    backward: Regex,
}

static SEED_PATTERNS: Lazy<HashMap<&'static str, SeedPatterns>> = Lazy::new(|| {
    let keywords = catalog::BASE_METRICS
        .iter()
        .chain(Category::ALL.iter().flat_map(|c| catalog::supplemental_metrics(*c).iter()))
        .flat_map(|d| d.keywords.iter().copied());

    keywords
        .filter_map(|keyword| {
            let escaped = regex::escape(keyword);
            let forward = Regex::new(&format!(r"(?:^|[^a-z0-9]){}{}{}", escaped, SEPARATOR, NUMBER)).ok()?;
            let backward = Regex::new(&format!(r"{}{}{}(?:[^a-z0-9]|$)", NUMBER, SEPARATOR, escaped)).ok()?;
            Some((keyword, SeedPatterns { forward, backward }))
        })
        .collect()
});

/// Find a number adjacent to any of `keywords` in a file name
///
/// Keywords are tried in order; for each one the forward form wins over the
/// backward form. Unparseable, missing or implausibly large numbers yield `None`.
pub fn extract_seed(file_name: &str, keywords: &[&str]) -> Option<f64> {
    let lower = file_name.to_lowercase();

    keywords.iter().find_map(|keyword| {
        let patterns = SEED_PATTERNS.get(*keyword)?;
        patterns
            .forward
            .captures(&lower)
            .or_else(|| patterns.backward.captures(&lower))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|seed| seed.is_finite() && *seed <= MAX_SEED)
    })
}

/// Round to a number of decimals, normalising negative zero
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn draw_value<R: Rng + ?Sized>(range: ValueRange, rng: &mut R) -> MetricValue {
    match range {
        ValueRange::Integer { min, span } => MetricValue::Number(min + (rng.gen::<f64>() * span).floor()),
        ValueRange::Decimal { min, span, precision } => {
            MetricValue::Number(round_to(min + rng.gen::<f64>() * span, precision))
        }
        ValueRange::BloodPressure => {
            let systolic = 110.0 + (rng.gen::<f64>() * 40.0).floor();
            let diastolic = 70.0 + (rng.gen::<f64>() * 20.0).floor();
            MetricValue::Text(format!("{}/{}", systolic, diastolic))
        }
    }
}

fn jitter_seed<R: Rng + ?Sized>(seed: f64, precision: u32, rng: &mut R) -> MetricValue {
    let factor = 1.0 + rng.gen_range(-SEED_JITTER..=SEED_JITTER);
    MetricValue::Number(round_to(seed * factor, precision))
}

fn draw_change<R: Rng + ?Sized>(range: ChangeRange, rng: &mut R) -> f64 {
    match range {
        ChangeRange::Integer { offset, span } => (rng.gen::<f64>() * span).floor() + offset,
        ChangeRange::Decimal { min, span, precision } => round_to(min + rng.gen::<f64>() * span, precision),
    }
}

/// Value one metric. Draw order is fixed: value, status, change.
pub fn generate_metric<R: Rng + ?Sized>(def: &MetricDefinition, seed: Option<f64>, rng: &mut R) -> Metric {
    let value = match seed {
        Some(seed) => jitter_seed(seed, def.value_range.precision(), rng),
        None => draw_value(def.value_range, rng),
    };

    let status = if rng.gen::<f64>() > def.normal_cutoff {
        MetricStatus::Normal
    } else {
        def.abnormal_status
    };

    let change = draw_change(def.change_range, rng);

    Metric {
        name: def.name.to_string(),
        value,
        unit: def.unit.to_string(),
        status,
        reference_range: def.reference_range.to_string(),
        change: Some(change),
        description: Some(def.description.to_string()),
    }
}

/// Value every metric in scope for a category, in catalog order
pub fn generate_metrics<R: Rng + ?Sized>(category: Category, file_name: Option<&str>, rng: &mut R) -> Vec<Metric> {
    catalog::definitions_for(category)
        .into_iter()
        .map(|def| {
            let seed = file_name.and_then(|name| extract_seed(name, def.keywords));
            if let Some(seed) = seed {
                debug!("Seeding {} from file name with {}", def.name, seed);
            }
            generate_metric(def, seed, rng)
        })
        .collect()
}

/// Turns an uploaded file into valued metrics
pub trait ReportExtractor: Send + Sync {
    /// Produce metrics for a file already assigned to `category`
    fn extract(&self, file: &UploadedFile, category: Category, rng: &mut dyn RngCore) -> Vec<Metric>;

    /// Short strategy name for logs
    fn name(&self) -> &'static str;
}

/// Mock extraction: synthetic values seeded by file-name keywords
#[derive(Debug, Default, Clone, Copy)]
pub struct FilenameHeuristicExtractor;

impl ReportExtractor for FilenameHeuristicExtractor {
    fn extract(&self, file: &UploadedFile, category: Category, rng: &mut dyn RngCore) -> Vec<Metric> {
        let file_name = Some(file.name.as_str()).filter(|n| !n.trim().is_empty());
        generate_metrics(category, file_name, rng)
    }

    fn name(&self) -> &'static str {
        "filename-heuristic"
    }
}
