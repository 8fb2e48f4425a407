//! Period-over-period comparison of a single metric.

use super::error::AnalysisResult;
use super::metrics::extract;
use super::periods::{filter_records, period_label, PeriodResolver};
use super::types::*;
use crate::config::ComparisonSettings;

/// Compare `metric` between the current and previous period.
///
/// Boundaries come from `resolver`; an explicit `custom` range overrides the
/// calendar period type.
pub fn compare(
    records: &[BidRecord],
    metric: MetricKind,
    period_type: PeriodType,
    custom: Option<PeriodBoundary>,
    resolver: &PeriodResolver,
    settings: &ComparisonSettings,
) -> AnalysisResult<ComparisonResult> {
    let (current, previous) = resolver.resolve_current_and_previous(period_type, custom)?;
    log::debug!(
        "Comparing {} for {} against {} ({})",
        metric,
        current,
        previous,
        period_type
    );
    Ok(compare_boundaries(records, metric, &current, &previous, settings))
}

/// Compare `metric` across two already resolved boundaries.
pub fn compare_boundaries(
    records: &[BidRecord],
    metric: MetricKind,
    current: &PeriodBoundary,
    previous: &PeriodBoundary,
    settings: &ComparisonSettings,
) -> ComparisonResult {
    let current = snapshot(records, metric, current);
    let previous = snapshot(records, metric, previous);

    let absolute_change = current.value - previous.value;
    let percentage_change = percentage_change(absolute_change, previous.value);
    let direction = change_direction(absolute_change, settings.stable_epsilon);
    let significance =
        sample_size_significance(current.record_count, previous.record_count, settings);

    ComparisonResult {
        current,
        previous,
        absolute_change,
        percentage_change,
        direction,
        significance,
        confidence: significance * 100.0,
    }
}

/// Filter `records` to `boundary` and reduce them to `metric`
pub fn snapshot(records: &[BidRecord], metric: MetricKind, boundary: &PeriodBoundary) -> PeriodSnapshot {
    let subset = filter_records(records, boundary);
    PeriodSnapshot {
        label: period_label(boundary),
        boundary: *boundary,
        value: extract(&subset, metric),
        record_count: subset.len(),
    }
}

/// `change / base * 100`, or `0` when there is no baseline.
///
/// A zero baseline reports zero rather than an infinite change.
pub fn percentage_change(change: f64, base: f64) -> f64 {
    if base != 0.0 {
        (change / base) * 100.0
    } else {
        0.0
    }
}

/// Classify a change, treating anything below `epsilon` as stable
pub fn change_direction(change: f64, epsilon: f64) -> ChangeDirection {
    if change.abs() < epsilon {
        ChangeDirection::Stable
    } else if change > 0.0 {
        ChangeDirection::Increase
    } else {
        ChangeDirection::Decrease
    }
}

/// Confidence score derived from sample sizes alone.
///
/// This is a heuristic, not a hypothesis test: small samples score
/// `low_sample_significance`, larger ones grow linearly with the smaller
/// sample up to `max_significance`.
pub fn sample_size_significance(
    current_count: usize,
    previous_count: usize,
    settings: &ComparisonSettings,
) -> f64 {
    if current_count < settings.min_sample_size || previous_count < settings.min_sample_size {
        return settings.low_sample_significance;
    }

    let min_size = current_count.min(previous_count) as f64;
    settings
        .max_significance
        .min(settings.base_significance + min_size / settings.significance_divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bids(count: usize, day: NaiveDate, outcome: BidOutcome, amount: f64) -> Vec<BidRecord> {
        (0..count)
            .map(|i| BidRecord::new(format!("{}-{}", day, i), day, outcome, amount, 10.0))
            .collect()
    }

    #[test]
    fn test_zero_baseline_reports_zero_percent() {
        assert_eq!(percentage_change(42.0, 0.0), 0.0);
        assert_eq!(percentage_change(-7.0, 0.0), 0.0);
        assert_eq!(percentage_change(5.0, 10.0), 50.0);
    }

    #[test]
    fn test_change_direction_threshold() {
        assert_eq!(change_direction(0.009, 0.01), ChangeDirection::Stable);
        assert_eq!(change_direction(-0.009, 0.01), ChangeDirection::Stable);
        assert_eq!(change_direction(0.01, 0.01), ChangeDirection::Increase);
        assert_eq!(change_direction(-3.0, 0.01), ChangeDirection::Decrease);
    }

    #[test]
    fn test_sample_size_significance() {
        let settings = ComparisonSettings::default();
        assert_eq!(sample_size_significance(4, 100, &settings), 0.1);
        assert_eq!(sample_size_significance(100, 4, &settings), 0.1);
        assert_eq!(sample_size_significance(10, 20, &settings), 0.5 + 10.0 / 100.0);
        assert_eq!(sample_size_significance(80, 90, &settings), 0.95);
    }

    #[test]
    fn test_month_over_month_comparison() {
        let mut records = bids(6, date(2024, 3, 5), BidOutcome::Won, 100.0);
        records.extend(bids(4, date(2024, 2, 5), BidOutcome::Won, 100.0));
        records.extend(bids(4, date(2024, 2, 6), BidOutcome::Lost, 100.0));

        let resolver = PeriodResolver::new(date(2024, 3, 20));
        let result = compare(
            &records,
            MetricKind::WinRate,
            PeriodType::MonthOverMonth,
            None,
            &resolver,
            &ComparisonSettings::default(),
        )
        .unwrap();

        assert_eq!(result.current.value, 100.0);
        assert_eq!(result.previous.value, 50.0);
        assert_eq!(result.current.record_count, 6);
        assert_eq!(result.previous.record_count, 8);
        assert_eq!(result.absolute_change, 50.0);
        assert_eq!(result.percentage_change, 100.0);
        assert_eq!(result.direction, ChangeDirection::Increase);
        assert_eq!(result.significance, 0.5 + 6.0 / 100.0);
        assert_eq!(result.confidence, result.significance * 100.0);
        assert_eq!(result.current.label, "2024-03");
    }

    #[test]
    fn test_empty_records_give_zeroed_result() {
        let resolver = PeriodResolver::new(date(2024, 3, 20));
        let result = compare(
            &[],
            MetricKind::TotalValue,
            PeriodType::YearOverYear,
            None,
            &resolver,
            &ComparisonSettings::default(),
        )
        .unwrap();

        assert_eq!(result.current.value, 0.0);
        assert_eq!(result.previous.value, 0.0);
        assert_eq!(result.percentage_change, 0.0);
        assert_eq!(result.direction, ChangeDirection::Stable);
        assert_eq!(result.significance, 0.1);
    }

    #[test]
    fn test_custom_range_comparison() {
        let mut records = bids(2, date(2024, 1, 12), BidOutcome::Lost, 300.0);
        records.extend(bids(1, date(2024, 1, 3), BidOutcome::Lost, 200.0));

        let current = PeriodBoundary::new(date(2024, 1, 11), date(2024, 1, 20)).unwrap();
        let resolver = PeriodResolver::new(date(2030, 1, 1));
        let result = compare(
            &records,
            MetricKind::TotalValue,
            PeriodType::Custom,
            Some(current),
            &resolver,
            &ComparisonSettings::default(),
        )
        .unwrap();

        assert_eq!(result.previous.boundary.start(), date(2024, 1, 1));
        assert_eq!(result.previous.boundary.end(), date(2024, 1, 10));
        assert_eq!(result.current.value, 600.0);
        assert_eq!(result.previous.value, 200.0);
        assert_eq!(result.percentage_change, 200.0);
    }
}
