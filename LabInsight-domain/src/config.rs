//! Analysis settings read from the environment

use std::env;
use tracing::warn;

/// Upper bound on the length of any recommendation list
pub const MAX_RECOMMENDATIONS: usize = 7;

/// Settings that shape report analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Maximum entries per recommendation set, within 1..=MAX_RECOMMENDATIONS
    pub recommendation_cap: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recommendation_cap: MAX_RECOMMENDATIONS,
        }
    }
}

impl AnalysisConfig {
    /// Build a config with the cap clamped into 1..=MAX_RECOMMENDATIONS
    pub fn with_recommendation_cap(cap: usize) -> Self {
        Self {
            recommendation_cap: cap.clamp(1, MAX_RECOMMENDATIONS),
        }
    }

    /// Load configuration from environment variables
    ///
    /// `RECOMMENDATION_CAP` accepts 1..=7; anything else keeps the default.
    pub fn from_env() -> Self {
        match env::var("RECOMMENDATION_CAP") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(cap) if (1..=MAX_RECOMMENDATIONS).contains(&cap) => Self::with_recommendation_cap(cap),
                _ => {
                    warn!(
                        "Ignoring RECOMMENDATION_CAP={}; expected 1..={}",
                        raw, MAX_RECOMMENDATIONS
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
