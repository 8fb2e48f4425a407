//! Historical performance analysis for tender bids.
//!
//! This module provides period comparison, multi-period trend analysis,
//! benchmark evaluation and insight generation over bid records, plus
//! JSON and text report writers.

pub mod error;
pub mod types;
pub mod metrics;
pub mod periods;
pub mod comparison;
pub mod trend;
pub mod benchmark;
pub mod insights;
pub mod report;

pub use error::{AnalysisError, AnalysisResult};
pub use types::*;
pub use insights::{BenchmarkInsight, Insight, InsightKey, SignificanceLevel};
pub use periods::PeriodResolver;
pub use report::{generate_json_report, generate_text_report};
