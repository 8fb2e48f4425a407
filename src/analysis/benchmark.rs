//! Benchmark evaluation: a metric measured against a reference value.

use super::comparison::percentage_change;
use super::error::{AnalysisError, AnalysisResult};
use super::metrics::extract;
use super::types::*;
use crate::config::BenchmarkSettings;

/// Evaluate `metric` over all of `records` against `benchmark`.
pub fn evaluate(
    records: &[BidRecord],
    metric: MetricKind,
    benchmark: f64,
    benchmark_type: BenchmarkType,
    settings: &BenchmarkSettings,
) -> AnalysisResult<BenchmarkResult> {
    evaluate_value(extract(records, metric), metric, benchmark, benchmark_type, settings)
}

/// Evaluate an already computed metric value against `benchmark`.
///
/// # Errors
///
/// [`AnalysisError::InvalidBenchmark`] when `benchmark` is NaN or infinite.
pub fn evaluate_value(
    current: f64,
    metric: MetricKind,
    benchmark: f64,
    benchmark_type: BenchmarkType,
    settings: &BenchmarkSettings,
) -> AnalysisResult<BenchmarkResult> {
    if !benchmark.is_finite() {
        return Err(AnalysisError::InvalidBenchmark(benchmark));
    }

    let difference = current - benchmark;
    let percentage_difference = percentage_change(difference, benchmark);
    let status = benchmark_status(difference, settings.at_epsilon);
    let rating = performance_rating(percentage_difference, metric, settings);

    log::debug!(
        "{} {:.2} vs {:?} benchmark {:.2}: {:?}, {:?}",
        metric,
        current,
        benchmark_type,
        benchmark,
        status,
        rating
    );

    Ok(BenchmarkResult {
        current,
        benchmark,
        benchmark_type,
        difference,
        percentage_difference,
        status,
        rating,
    })
}

pub fn benchmark_status(difference: f64, epsilon: f64) -> BenchmarkStatus {
    if difference.abs() < epsilon {
        BenchmarkStatus::At
    } else if difference > 0.0 {
        BenchmarkStatus::Above
    } else {
        BenchmarkStatus::Below
    }
}

/// Rate a percentage difference from the benchmark.
///
/// Lower-is-better metrics use the same thresholds with the sign flipped, so
/// being 25% under the benchmark on preparation time rates as excellent.
pub fn performance_rating(
    percentage_difference: f64,
    metric: MetricKind,
    settings: &BenchmarkSettings,
) -> PerformanceRating {
    let score = if metric.is_positive_oriented() {
        percentage_difference
    } else {
        -percentage_difference
    };

    if score > settings.excellent_percent {
        PerformanceRating::Excellent
    } else if score > settings.good_percent {
        PerformanceRating::Good
    } else if score > settings.average_percent {
        PerformanceRating::Average
    } else {
        PerformanceRating::Poor
    }
}
