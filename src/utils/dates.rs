//! Calendar arithmetic on whole months.
//!
//! Months are addressed by a linear index (`year * 12 + month0`) so that
//! stepping across year boundaries is plain integer arithmetic. Quarters and
//! years are spans of 3 and 12 months aligned to index multiples.

use chrono::{Datelike, NaiveDate};

/// Linear month index of a date
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// First day of the month with the given linear index
pub fn month_start(index: i64) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Index of the first month of the `span`-month block containing `index`.
///
/// With `span` 3 this yields January/April/July/October, with 12 January.
pub fn aligned_index(index: i64, span: u32) -> i64 {
    let span = i64::from(span.max(1));
    index - index.rem_euclid(span)
}

/// Inclusive first and last day of `span` months starting at `index`
pub fn month_span(index: i64, span: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = month_start(index)?;
    let end = month_start(index + i64::from(span.max(1)))?.pred_opt()?;
    Some((start, end))
}

/// January 1st through December 31st of `year`
pub fn year_span(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Whether `[start, end]` covers exactly one aligned block of `span` months
pub fn is_aligned_span(start: NaiveDate, end: NaiveDate, span: u32) -> bool {
    let index = month_index(start);
    start.day() == 1
        && aligned_index(index, span) == index
        && month_span(index, span).map(|(_, e)| e == end).unwrap_or(false)
}
