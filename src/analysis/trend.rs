//! Multi-period trend analysis.
//!
//! Builds a chronological series of a metric over consecutive calendar
//! periods, fits a least-squares line through `(index, value)` and
//! classifies the trend's direction, strength and volatility.

use super::comparison::{percentage_change, snapshot};
use super::error::AnalysisResult;
use super::periods::PeriodResolver;
use super::types::*;
use crate::config::TrendSettings;

/// Series plus everything derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalysis {
    pub series: Vec<PeriodSnapshot>,
    pub period_changes: Vec<PeriodChange>,
    pub regression: Option<RegressionFit>,
    pub characterization: TrendCharacterization,
    pub statistics: SeriesStatistics,
}

/// Analyze `metric` over the last `periods` calendar periods of `granularity`.
pub fn analyze(
    records: &[BidRecord],
    metric: MetricKind,
    granularity: Granularity,
    periods: usize,
    resolver: &PeriodResolver,
    settings: &TrendSettings,
) -> AnalysisResult<TrendAnalysis> {
    let boundaries = resolver.resolve_last_n(granularity, periods)?;
    let series = build_series(records, metric, &boundaries);
    let values: Vec<f64> = series.iter().map(|s| s.value).collect();

    let regression = linear_regression(&values);
    let characterization = characterize(&values, regression.as_ref(), settings);
    log::debug!(
        "{} {} trend over {} periods: {:?}",
        granularity,
        metric,
        series.len(),
        characterization.direction
    );

    Ok(TrendAnalysis {
        period_changes: period_changes(&series),
        statistics: calculate_statistics(&values),
        regression,
        characterization,
        series,
    })
}

/// One snapshot per boundary, in boundary order
pub fn build_series(
    records: &[BidRecord],
    metric: MetricKind,
    boundaries: &[PeriodBoundary],
) -> Vec<PeriodSnapshot> {
    boundaries
        .iter()
        .map(|boundary| snapshot(records, metric, boundary))
        .collect()
}

/// Change from each entry to the next, labelled with the later period
pub fn period_changes(series: &[PeriodSnapshot]) -> Vec<PeriodChange> {
    series
        .windows(2)
        .map(|pair| {
            let change = pair[1].value - pair[0].value;
            PeriodChange {
                label: pair[1].label.clone(),
                value: pair[1].value,
                change,
                change_percent: percentage_change(change, pair[0].value),
            }
        })
        .collect()
}

/// Ordinary least-squares fit of `(i, values[i])`.
///
/// Returns `None` for fewer than two points. When every value is equal the
/// fit is exact and `r_squared` is 1.
pub fn linear_regression(values: &[f64]) -> Option<RegressionFit> {
    if values.len() < 2 {
        return None;
    }
    if is_constant(values) {
        return Some(RegressionFit {
            slope: 0.0,
            intercept: values[0],
            r_squared: 1.0,
        });
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = values.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (slope * i as f64 + intercept)).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(RegressionFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Classify a series.
///
/// Series shorter than `settings.min_points` get
/// [`TrendCharacterization::insufficient_data`].
pub fn characterize(
    values: &[f64],
    regression: Option<&RegressionFit>,
    settings: &TrendSettings,
) -> TrendCharacterization {
    let fit = match regression {
        Some(fit) if values.len() >= settings.min_points => fit,
        _ => return TrendCharacterization::insufficient_data(),
    };

    let volatility = coefficient_of_variation(&calculate_statistics(values));

    let direction = if volatility > settings.volatility_threshold {
        TrendDirection::Volatile
    } else if fit.slope.abs() < settings.stable_slope {
        TrendDirection::Stable
    } else if fit.slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    let strength = if fit.r_squared > settings.strong_r_squared {
        TrendStrength::Strong
    } else if fit.r_squared > settings.moderate_r_squared {
        TrendStrength::Moderate
    } else {
        TrendStrength::Weak
    };

    TrendCharacterization {
        direction,
        strength,
        consistency: (1.0 - volatility).max(0.0),
        volatility,
    }
}

/// Standard deviation over mean, or `0` when the mean is not positive
pub fn coefficient_of_variation(stats: &SeriesStatistics) -> f64 {
    if stats.mean > 0.0 {
        stats.standard_deviation / stats.mean
    } else {
        0.0
    }
}

/// Descriptive statistics; all zero for an empty series
pub fn calculate_statistics(values: &[f64]) -> SeriesStatistics {
    if values.is_empty() {
        return SeriesStatistics::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    if min == max {
        // Exact statistics for a constant series
        return SeriesStatistics {
            mean: min,
            median: min,
            min,
            max,
            ..SeriesStatistics::default()
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    SeriesStatistics {
        mean,
        median,
        standard_deviation: variance.sqrt(),
        min,
        max,
        range: max - min,
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}
