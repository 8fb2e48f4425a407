//! Error type for the comparison engine.

use chrono::NaiveDate;

use crate::source::SourceError;

/// Errors raised for invalid caller input.
///
/// Insufficient data and zero denominators are not errors; they resolve to
/// the documented zero/fallback results instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid period range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Custom period comparison requires an explicit start and end date")]
    MissingCustomRange,

    #[error("Period boundary falls outside the supported calendar range")]
    DateOutOfRange,

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown comparison period: {0}")]
    UnknownPeriod(String),

    #[error("Unknown trend granularity: {0}")]
    UnknownGranularity(String),

    #[error("Unknown benchmark type: {0}")]
    UnknownBenchmarkType(String),

    #[error("Number of trend periods must be at least 1, got {0}")]
    InvalidPeriodCount(usize),

    #[error("Benchmark value must be a finite number, got {0}")]
    InvalidBenchmark(f64),

    #[error("Failed to retrieve records: {0}")]
    Source(#[from] SourceError),
}

/// Result alias used by the engine.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
