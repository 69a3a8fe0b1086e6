//! Per-category reference data and population distribution curves

use std::f64::consts::PI;

use crate::entities::profile::{BellCurveParams, BellCurvePoint, CategoryProfile, RangePosition, TrendPoint};
use crate::entities::report::Category;
use crate::services::generator::round_to;
use crate::services::recommendations::category_recommendations;

/// Intervals between mean - 3σ and mean + 3σ
pub const BELL_CURVE_STEPS: usize = 30;

/// Sample the Gaussian density from mean - 3σ to mean + 3σ
///
/// Returns `BELL_CURVE_STEPS + 1` points with x rounded to two decimals, or
/// nothing when σ is not positive.
pub fn bell_curve(mean: f64, std_dev: f64) -> Vec<BellCurvePoint> {
    if !(std_dev > 0.0) || !mean.is_finite() || !std_dev.is_finite() {
        return Vec::new();
    }

    let start = mean - 3.0 * std_dev;
    let step = 6.0 * std_dev / BELL_CURVE_STEPS as f64;
    let norm = 1.0 / (std_dev * (2.0 * PI).sqrt());

    (0..=BELL_CURVE_STEPS)
        .map(|i| {
            let x = start + step * i as f64;
            let y = norm * (-0.5 * ((x - mean) / std_dev).powi(2)).exp();
            BellCurvePoint { x: round_to(x, 2), y }
        })
        .collect()
}

/// Place a value against an inclusive reference range
pub fn range_position(value: f64, min: f64, max: f64) -> RangePosition {
    if value < min {
        RangePosition::Below
    } else if value > max {
        RangePosition::Above
    } else {
        RangePosition::Normal
    }
}

fn primary_metric(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Diabetes => ("Blood Glucose", "mg/dL"),
        Category::Heart => ("Total Cholesterol", "mg/dL"),
        Category::Kidney => ("Creatinine", "mg/dL"),
        Category::Thyroid => ("TSH", "mIU/L"),
        Category::Liver => ("ALT", "U/L"),
        Category::General => ("Blood Glucose", "units"),
    }
}

const TREND_DATES: [&str; 4] = ["2023-01-01", "2023-03-15", "2023-06-30", "2023-09-15"];

fn trend_values(category: Category) -> [f64; 4] {
    match category {
        Category::Diabetes => [105.0, 98.0, 92.0, 98.0],
        Category::Heart => [190.0, 180.0, 175.0, 175.0],
        Category::Kidney => [1.0, 0.9, 0.95, 0.9],
        Category::Thyroid => [2.8, 2.5, 2.6, 2.5],
        Category::Liver => [34.0, 30.0, 28.0, 29.0],
        Category::General => [100.0; 4],
    }
}

fn risk_factors(category: Category) -> [&'static str; 3] {
    match category {
        Category::Diabetes => ["Type 2 Diabetes", "Cardiovascular Disease", "Nerve Damage"],
        Category::Heart => ["Coronary Artery Disease", "Stroke", "Hypertension"],
        Category::Kidney => ["Chronic Kidney Disease", "Kidney Stones", "Hypertension"],
        Category::Thyroid => ["Hypothyroidism", "Hyperthyroidism", "Autoimmune Thyroiditis"],
        Category::Liver => ["Fatty Liver Disease", "Hepatitis", "Cirrhosis"],
        Category::General => ["Health Risk"; 3],
    }
}

/// Population distribution parameters for a category's primary metric
pub fn bell_curve_params(category: Category) -> BellCurveParams {
    let (mean, std_dev, user_value, reference_min, reference_max) = match category {
        Category::Diabetes => (100.0, 15.0, 98.0, 70.0, 100.0),
        Category::Heart => (180.0, 30.0, 175.0, 125.0, 200.0),
        Category::Kidney => (0.9, 0.2, 0.9, 0.6, 1.2),
        Category::Thyroid => (2.0, 0.8, 2.5, 0.4, 4.0),
        Category::Liver => (30.0, 10.0, 29.0, 7.0, 56.0),
        Category::General => (100.0, 15.0, 100.0, 70.0, 130.0),
    };

    BellCurveParams {
        mean,
        std_dev,
        user_value,
        reference_min,
        reference_max,
    }
}

/// Reference data for a category detail view
pub fn category_profile(category: Category, recommendation_cap: usize) -> CategoryProfile {
    let (primary, unit) = primary_metric(category);
    let params = bell_curve_params(category);

    CategoryProfile {
        category,
        display_name: category.display_name().to_string(),
        primary_metric: primary.to_string(),
        primary_metric_unit: unit.to_string(),
        trend: TREND_DATES
            .iter()
            .zip(trend_values(category))
            .map(|(date, value)| TrendPoint {
                date: date.to_string(),
                value,
            })
            .collect(),
        risk_factors: risk_factors(category).iter().map(|r| r.to_string()).collect(),
        bell_curve: params,
        distribution: bell_curve(params.mean, params.std_dev),
        user_position: range_position(params.user_value, params.reference_min, params.reference_max),
        recommendations: category_recommendations(category, recommendation_cap),
    }
}
