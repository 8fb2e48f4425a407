//! Analysis configuration.
//!
//! Every threshold the engine uses lives here with its documented default,
//! so a YAML file only needs to name the values it changes:
//!
//! ```yaml
//! general:
//!   locale: ar
//! trend:
//!   volatility_threshold: 0.25
//! ```

use serde::{Deserialize, Serialize};

/// Top-level configuration mirroring the YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub general: GeneralConfig,
    pub comparison: ComparisonSettings,
    pub trend: TrendSettings,
    pub benchmark: BenchmarkSettings,
    pub insights: InsightSettings,
}

impl AnalysisConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.general.validate()?;
        self.comparison.validate()?;
        self.trend.validate()?;
        self.benchmark.validate()?;
        self.insights.validate()?;
        Ok(())
    }
}

/// Report-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Locale used when rendering insight keys into text
    pub locale: String,
    /// Currency code appended to monetary values in text reports
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            currency: "SAR".to_string(),
            log_level: None,
        }
    }
}

impl GeneralConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.locale.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral("locale cannot be empty".to_string()));
        }
        if self.currency.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral("currency cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Period-over-period comparison thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    /// Changes smaller than this (absolute) are reported as stable
    pub stable_epsilon: f64,
    /// Either period below this many records gets `low_sample_significance`
    pub min_sample_size: usize,
    pub low_sample_significance: f64,
    /// Significance is `base + min(count) / divisor`, capped at `max`
    pub base_significance: f64,
    pub significance_divisor: f64,
    pub max_significance: f64,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            stable_epsilon: 0.01,
            min_sample_size: 5,
            low_sample_significance: 0.1,
            base_significance: 0.5,
            significance_divisor: 100.0,
            max_significance: 0.95,
        }
    }
}

impl ComparisonSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(self.stable_epsilon >= 0.0) {
            return Err(ValidationError::InvalidComparison(
                "stable_epsilon must be non-negative".to_string(),
            ));
        }
        for (name, value) in [
            ("low_sample_significance", self.low_sample_significance),
            ("base_significance", self.base_significance),
            ("max_significance", self.max_significance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidComparison(format!(
                    "{} must be within 0..=1, got {}",
                    name, value
                )));
            }
        }
        if !(self.significance_divisor > 0.0) {
            return Err(ValidationError::InvalidComparison(
                "significance_divisor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trend classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Number of periods analyzed when the caller does not specify one
    pub default_periods: usize,
    /// Series shorter than this get the insufficient-data result
    pub min_points: usize,
    /// Slopes with a smaller magnitude are stable
    pub stable_slope: f64,
    /// Coefficient of variation above which a trend is volatile
    pub volatility_threshold: f64,
    pub strong_r_squared: f64,
    pub moderate_r_squared: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            default_periods: 12,
            min_points: 3,
            stable_slope: 0.1,
            volatility_threshold: 0.3,
            strong_r_squared: 0.7,
            moderate_r_squared: 0.4,
        }
    }
}

impl TrendSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.default_periods == 0 {
            return Err(ValidationError::InvalidTrend(
                "default_periods must be at least 1".to_string(),
            ));
        }
        // A regression needs two distinct points
        if self.min_points < 2 {
            return Err(ValidationError::InvalidTrend(
                "min_points must be at least 2".to_string(),
            ));
        }
        if !(self.stable_slope >= 0.0) || !(self.volatility_threshold >= 0.0) {
            return Err(ValidationError::InvalidTrend(
                "stable_slope and volatility_threshold must be non-negative".to_string(),
            ));
        }
        if !(self.moderate_r_squared < self.strong_r_squared) {
            return Err(ValidationError::InvalidTrend(format!(
                "moderate_r_squared ({}) must be below strong_r_squared ({})",
                self.moderate_r_squared, self.strong_r_squared
            )));
        }
        Ok(())
    }
}

/// Benchmark rating thresholds, in percent difference from the benchmark.
///
/// They apply as-is to higher-is-better metrics and with the sign flipped to
/// lower-is-better metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    pub at_epsilon: f64,
    pub excellent_percent: f64,
    pub good_percent: f64,
    pub average_percent: f64,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            at_epsilon: 0.01,
            excellent_percent: 20.0,
            good_percent: 10.0,
            average_percent: -10.0,
        }
    }
}

impl BenchmarkSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(self.at_epsilon >= 0.0) {
            return Err(ValidationError::InvalidBenchmark(
                "at_epsilon must be non-negative".to_string(),
            ));
        }
        if !(self.excellent_percent > self.good_percent && self.good_percent > self.average_percent) {
            return Err(ValidationError::InvalidBenchmark(format!(
                "thresholds must satisfy excellent > good > average, got {} / {} / {}",
                self.excellent_percent, self.good_percent, self.average_percent
            )));
        }
        Ok(())
    }
}

/// Insight classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    pub high_significance: f64,
    pub medium_significance: f64,
    /// Percentage changes beyond this (absolute) add a monitoring recommendation
    pub large_change_percent: f64,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            high_significance: 0.7,
            medium_significance: 0.4,
            large_change_percent: 20.0,
        }
    }
}

impl InsightSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(self.medium_significance < self.high_significance) {
            return Err(ValidationError::InvalidInsights(format!(
                "medium_significance ({}) must be below high_significance ({})",
                self.medium_significance, self.high_significance
            )));
        }
        if !(self.large_change_percent >= 0.0) {
            return Err(ValidationError::InvalidInsights(
                "large_change_percent must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid comparison configuration: {0}")]
    InvalidComparison(String),
    #[error("Invalid trend configuration: {0}")]
    InvalidTrend(String),
    #[error("Invalid benchmark configuration: {0}")]
    InvalidBenchmark(String),
    #[error("Invalid insight configuration: {0}")]
    InvalidInsights(String),
}
