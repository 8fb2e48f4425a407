//! Period boundary resolution and record filtering.
//!
//! Calendar periods (month, quarter, year) snap to calendar unit starts and
//! ends. Every resolved pair satisfies `previous.end + 1 day == current.start`.

use chrono::{Datelike, Duration, NaiveDate};

use super::error::{AnalysisError, AnalysisResult};
use super::types::{BidRecord, Granularity, PeriodBoundary, PeriodType};
use crate::utils::dates::{aligned_index, is_aligned_span, month_index, month_span, year_span};

/// Resolves period boundaries relative to a fixed reference date.
///
/// The reference date stands in for "now" so repeated runs over the same
/// records give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodResolver {
    as_of: NaiveDate,
}

impl PeriodResolver {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Resolve the current period and the one immediately before it.
    ///
    /// An explicit `custom` range takes precedence over the calendar period
    /// type, so it is honoured for any `period_type`. `PeriodType::Custom`
    /// without a range is an error.
    pub fn resolve_current_and_previous(
        &self,
        period_type: PeriodType,
        custom: Option<PeriodBoundary>,
    ) -> AnalysisResult<(PeriodBoundary, PeriodBoundary)> {
        if let Some(current) = custom {
            return Ok((current, previous_of_custom(&current)?));
        }

        let granularity = period_type
            .granularity()
            .ok_or(AnalysisError::MissingCustomRange)?;
        let current = calendar_period(granularity, self.as_of, 0)?;
        let previous = calendar_period(granularity, self.as_of, -1)?;
        Ok((current, previous))
    }

    /// `n` consecutive calendar periods, oldest first, the last one containing
    /// the reference date.
    pub fn resolve_last_n(
        &self,
        granularity: Granularity,
        n: usize,
    ) -> AnalysisResult<Vec<PeriodBoundary>> {
        if n == 0 {
            return Err(AnalysisError::InvalidPeriodCount(n));
        }
        let n = i64::try_from(n).map_err(|_| AnalysisError::DateOutOfRange)?;

        (0..n)
            .rev()
            .map(|back| calendar_period(granularity, self.as_of, -back))
            .collect()
    }

    /// Calendar year `year` and the year before it
    pub fn year_over_year_for(&self, year: i32) -> AnalysisResult<(PeriodBoundary, PeriodBoundary)> {
        let (start, end) = year_span(year).ok_or(AnalysisError::DateOutOfRange)?;
        let (prev_start, prev_end) = year_span(year - 1).ok_or(AnalysisError::DateOutOfRange)?;
        Ok((
            PeriodBoundary::new(start, end)?,
            PeriodBoundary::new(prev_start, prev_end)?,
        ))
    }
}

/// The calendar period of `granularity` containing `anchor`, shifted by
/// `offset` whole periods (negative = earlier).
pub fn calendar_period(
    granularity: Granularity,
    anchor: NaiveDate,
    offset: i64,
) -> AnalysisResult<PeriodBoundary> {
    let span = granularity.months();
    let index = aligned_index(month_index(anchor), span) + offset * i64::from(span);
    let (start, end) = month_span(index, span).ok_or(AnalysisError::DateOutOfRange)?;
    PeriodBoundary::new(start, end)
}

/// Period of identical length ending the day before `current` starts.
///
/// `previous.end = current.start - 1 day` and
/// `previous.start = previous.end - (current.end - current.start)`.
pub fn previous_of_custom(current: &PeriodBoundary) -> AnalysisResult<PeriodBoundary> {
    let span: Duration = current.end() - current.start();
    let end = current.start().pred_opt().ok_or(AnalysisError::DateOutOfRange)?;
    let start = end
        .checked_sub_signed(span)
        .ok_or(AnalysisError::DateOutOfRange)?;
    PeriodBoundary::new(start, end)
}

/// Records submitted within `boundary`, both ends inclusive
pub fn filter_records<'a>(records: &'a [BidRecord], boundary: &PeriodBoundary) -> Vec<&'a BidRecord> {
    records
        .iter()
        .filter(|r| boundary.contains(r.submission_date))
        .collect()
}

/// Locale-neutral period label.
///
/// `2024-03` for a calendar month, `2024-Q1` for a calendar quarter, `2024`
/// for a calendar year, otherwise `2024-01-10..2024-02-09`.
pub fn period_label(boundary: &PeriodBoundary) -> String {
    let (start, end) = (boundary.start(), boundary.end());

    if is_aligned_span(start, end, 12) {
        format!("{}", start.year())
    } else if is_aligned_span(start, end, 3) {
        format!("{}-Q{}", start.year(), start.month0() / 3 + 1)
    } else if is_aligned_span(start, end, 1) {
        format!("{}-{:02}", start.year(), start.month())
    } else {
        boundary.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BidOutcome;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_contiguous(previous: &PeriodBoundary, current: &PeriodBoundary) {
        assert_eq!(
            previous.end().succ_opt().unwrap(),
            current.start(),
            "{} should end the day before {} starts",
            previous,
            current
        );
    }

    #[test]
    fn test_month_over_month_boundaries() {
        let resolver = PeriodResolver::new(date(2024, 3, 18));
        let (current, previous) = resolver
            .resolve_current_and_previous(PeriodType::MonthOverMonth, None)
            .unwrap();
        assert_eq!((current.start(), current.end()), (date(2024, 3, 1), date(2024, 3, 31)));
        assert_eq!((previous.start(), previous.end()), (date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_quarter_over_quarter_crosses_year() {
        let resolver = PeriodResolver::new(date(2024, 2, 10));
        let (current, previous) = resolver
            .resolve_current_and_previous(PeriodType::QuarterOverQuarter, None)
            .unwrap();
        assert_eq!((current.start(), current.end()), (date(2024, 1, 1), date(2024, 3, 31)));
        assert_eq!((previous.start(), previous.end()), (date(2023, 10, 1), date(2023, 12, 31)));
    }

    #[test]
    fn test_all_period_types_are_contiguous() {
        let anchors = [date(2024, 1, 1), date(2024, 2, 29), date(2023, 12, 31), date(2025, 7, 15)];
        for anchor in anchors {
            let resolver = PeriodResolver::new(anchor);
            for period_type in [
                PeriodType::MonthOverMonth,
                PeriodType::QuarterOverQuarter,
                PeriodType::YearOverYear,
            ] {
                let (current, previous) =
                    resolver.resolve_current_and_previous(period_type, None).unwrap();
                assert_contiguous(&previous, &current);
                assert!(current.contains(anchor));
            }

            let custom = PeriodBoundary::new(date(2024, 1, 10), anchor.max(date(2024, 1, 10))).unwrap();
            let (current, previous) = resolver
                .resolve_current_and_previous(PeriodType::Custom, Some(custom))
                .unwrap();
            assert_contiguous(&previous, &current);
            assert_eq!(previous.days(), current.days());
        }
    }

    #[test]
    fn test_custom_previous_has_identical_duration() {
        let current = PeriodBoundary::new(date(2024, 3, 1), date(2024, 3, 10)).unwrap();
        let previous = previous_of_custom(&current).unwrap();
        assert_eq!(previous.end(), date(2024, 2, 29));
        assert_eq!(previous.start(), date(2024, 2, 20));
        assert_eq!(previous.days(), 10);
    }

    #[test]
    fn test_custom_without_range_is_an_error() {
        let resolver = PeriodResolver::new(date(2024, 3, 18));
        let err = resolver
            .resolve_current_and_previous(PeriodType::Custom, None)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCustomRange));
    }

    #[test]
    fn test_last_n_months_oldest_first() {
        let resolver = PeriodResolver::new(date(2024, 2, 14));
        let periods = resolver.resolve_last_n(Granularity::Monthly, 4).unwrap();
        let starts: Vec<NaiveDate> = periods.iter().map(|p| p.start()).collect();
        assert_eq!(
            starts,
            vec![date(2023, 11, 1), date(2023, 12, 1), date(2024, 1, 1), date(2024, 2, 1)]
        );
        for pair in periods.windows(2) {
            assert_contiguous(&pair[0], &pair[1]);
        }
    }

    #[test]
    fn test_last_n_quarters_are_consecutive() {
        let resolver = PeriodResolver::new(date(2024, 5, 5));
        let periods = resolver.resolve_last_n(Granularity::Quarterly, 5).unwrap();
        assert_eq!(periods.len(), 5);
        assert_eq!(periods[0].start(), date(2023, 4, 1));
        assert_eq!(periods[4].end(), date(2024, 6, 30));
        for pair in periods.windows(2) {
            assert_contiguous(&pair[0], &pair[1]);
        }
    }

    #[test]
    fn test_last_n_rejects_zero() {
        let resolver = PeriodResolver::new(date(2024, 5, 5));
        assert!(matches!(
            resolver.resolve_last_n(Granularity::Yearly, 0),
            Err(AnalysisError::InvalidPeriodCount(0))
        ));
    }

    #[test]
    fn test_filter_is_inclusive() {
        let records = vec![
            BidRecord::new("a", date(2024, 1, 31), BidOutcome::Won, 1.0, 1.0),
            BidRecord::new("b", date(2024, 2, 1), BidOutcome::Won, 1.0, 1.0),
            BidRecord::new("c", date(2024, 2, 29), BidOutcome::Won, 1.0, 1.0),
            BidRecord::new("d", date(2024, 3, 1), BidOutcome::Won, 1.0, 1.0),
        ];
        let february = calendar_period(Granularity::Monthly, date(2024, 2, 10), 0).unwrap();
        let ids: Vec<&str> = filter_records(&records, &february)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_period_labels() {
        let anchor = date(2024, 8, 9);
        let month = calendar_period(Granularity::Monthly, anchor, 0).unwrap();
        let quarter = calendar_period(Granularity::Quarterly, anchor, 0).unwrap();
        let year = calendar_period(Granularity::Yearly, anchor, 0).unwrap();
        let custom = PeriodBoundary::new(date(2024, 1, 10), date(2024, 2, 9)).unwrap();

        assert_eq!(period_label(&month), "2024-08");
        assert_eq!(period_label(&quarter), "2024-Q3");
        assert_eq!(period_label(&year), "2024");
        assert_eq!(period_label(&custom), "2024-01-10..2024-02-09");
    }
}
