//! Reduction of a record subset to a single metric value.

use super::types::{BidRecord, MetricKind};

/// Reduce `records` to the value of `metric`.
///
/// An empty slice yields `0.0` for every metric. Accepts both owned records
/// and the borrowed subsets produced by period filtering.
pub fn extract<R: AsRef<BidRecord>>(records: &[R], metric: MetricKind) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let count = records.len() as f64;
    match metric {
        MetricKind::WinRate => {
            let won = records
                .iter()
                .map(|r| r.as_ref())
                .filter(|r: &&BidRecord| r.is_won())
                .count();
            (won as f64 / count) * 100.0
        }
        MetricKind::AverageMargin => sum_of(records, |r| r.planned_margin) / count,
        MetricKind::TotalValue => sum_of(records, |r| r.bid_amount),
        MetricKind::BidCount => count,
        MetricKind::AverageBidValue => sum_of(records, |r| r.bid_amount) / count,
        MetricKind::CompetitorCount => sum_of(records, |r| f64::from(r.competitor_count)) / count,
        MetricKind::PreparationTime => sum_of(records, |r| r.preparation_time) / count,
    }
}

fn sum_of<R: AsRef<BidRecord>>(records: &[R], field: impl Fn(&BidRecord) -> f64) -> f64 {
    records.iter().map(|r| field(AsRef::<BidRecord>::as_ref(r))).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BidOutcome;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<BidRecord> {
        vec![
            BidRecord::new("T-1", date(2024, 1, 15), BidOutcome::Won, 5_000_000.0, 18.0)
                .with_competitor_count(4)
                .with_preparation_time(40.0),
            BidRecord::new("T-2", date(2024, 2, 15), BidOutcome::Lost, 3_000_000.0, 15.0)
                .with_competitor_count(6)
                .with_preparation_time(20.0),
        ]
    }

    #[test]
    fn test_empty_input_is_zero_for_every_metric() {
        let empty: Vec<BidRecord> = Vec::new();
        for metric in MetricKind::ALL {
            assert_eq!(extract(&empty, metric), 0.0, "{} should be zero", metric);
        }
    }

    #[test]
    fn test_combined_period_scenario() {
        let records = sample();
        assert_eq!(extract(&records, MetricKind::WinRate), 50.0);
        assert_eq!(extract(&records, MetricKind::AverageMargin), 16.5);
        assert_eq!(extract(&records, MetricKind::TotalValue), 8_000_000.0);
        assert_eq!(extract(&records, MetricKind::BidCount), 2.0);
        assert_eq!(extract(&records, MetricKind::AverageBidValue), 4_000_000.0);
        assert_eq!(extract(&records, MetricKind::CompetitorCount), 5.0);
        assert_eq!(extract(&records, MetricKind::PreparationTime), 30.0);
    }

    #[test]
    fn test_pending_bids_count_against_win_rate() {
        let mut records = sample();
        records.push(BidRecord::new("T-3", date(2024, 3, 1), BidOutcome::Pending, 1.0, 10.0));
        records.push(BidRecord::new("T-4", date(2024, 3, 2), BidOutcome::Pending, 1.0, 10.0));
        assert_eq!(extract(&records, MetricKind::WinRate), 25.0);
    }

    #[test]
    fn test_borrowed_subsets() {
        let records = sample();
        let won: Vec<&BidRecord> = records.iter().filter(|r| r.is_won()).collect();
        assert_eq!(extract(&won, MetricKind::WinRate), 100.0);
        assert_eq!(extract(&won, MetricKind::TotalValue), 5_000_000.0);
    }
}
