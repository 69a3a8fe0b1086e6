// Domain entities and value objects
pub mod report;
pub mod profile;
pub mod conversions;

// Re-export common types for easier imports
pub use report::{
    AiInsights, Category, Metric, MetricStatus, MetricValue, OverallHealth, RecommendationSet,
    Report, Summary, Trends, UploadedFile,
};
pub use profile::{BellCurveParams, BellCurvePoint, CategoryProfile, RangePosition, TrendPoint};
