use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::report::{Category, RecommendationSet};

/// One sample of the population density curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BellCurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Where a value sits relative to a reference range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RangePosition {
    Below,
    Normal,
    Above,
}

/// Parameters of a category's population distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BellCurveParams {
    pub mean: f64,
    pub std_dev: f64,
    pub user_value: f64,
    pub reference_min: f64,
    pub reference_max: f64,
}

/// Dated value of the primary metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TrendPoint {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub value: f64,
}

/// Reference data behind a category detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfile {
    pub category: Category,
    pub display_name: String,
    pub primary_metric: String,
    pub primary_metric_unit: String,
    pub trend: Vec<TrendPoint>,
    pub risk_factors: Vec<String>,
    pub bell_curve: BellCurveParams,
    pub distribution: Vec<BellCurvePoint>,
    pub user_position: RangePosition,
    pub recommendations: RecommendationSet,
}
