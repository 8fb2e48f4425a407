//! Record sanity checks.
//!
//! The engine accepts any record set; these checks only surface data that is
//! likely to distort the metrics so the caller can decide what to do.

use std::collections::HashSet;

use crate::analysis::{BidOutcome, BidRecord};

/// A single issue found in a record set
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    pub record_id: String,
    pub message: String,
}

/// Audit a record set for values that would skew the metrics
///
/// Checks for:
/// - Duplicate record ids (the record is counted twice)
/// - Negative or non-finite bid amounts
/// - Planned or actual margins outside -100..=100 percent
/// - Negative or non-finite preparation time
/// - Decided (won or lost) bids with no recorded competitors
///
/// # Arguments
/// * `records` - The records about to be analyzed
///
/// # Returns
/// Every issue found, in record order. Each issue is also logged as a warning.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tender_trends::analysis::{BidOutcome, BidRecord};
/// use tender_trends::utils::validation::audit_records;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let records = vec![BidRecord::new("T-1", date, BidOutcome::Won, -5.0, 18.0).with_competitor_count(4)];
/// assert_eq!(audit_records(&records).len(), 1);
/// ```
pub fn audit_records(records: &[BidRecord]) -> Vec<RecordIssue> {
    let mut issues = Vec::new();
    let mut seen_ids = HashSet::new();

    for record in records {
        let mut push = |message: String| {
            issues.push(RecordIssue {
                record_id: record.id.clone(),
                message,
            });
        };

        if !seen_ids.insert(record.id.as_str()) {
            push("duplicate record id".to_string());
        }

        if !record.bid_amount.is_finite() || record.bid_amount < 0.0 {
            push(format!("bid amount {} is negative or not a number", record.bid_amount));
        }

        if !is_valid_margin(record.planned_margin) {
            push(format!("planned margin {}% is outside -100..=100", record.planned_margin));
        }

        if let Some(actual) = record.actual_margin {
            if !is_valid_margin(actual) {
                push(format!("actual margin {}% is outside -100..=100", actual));
            }
        }

        if !record.preparation_time.is_finite() || record.preparation_time < 0.0 {
            push(format!(
                "preparation time {} is negative or not a number",
                record.preparation_time
            ));
        }

        // Pending bids are exempt
        if record.competitor_count == 0 && record.outcome != BidOutcome::Pending {
            push(format!("{:?} bid has no recorded competitors", record.outcome).to_lowercase());
        }
    }

    for issue in &issues {
        log::warn!("Record '{}': {}", issue.record_id, issue.message);
    }
    if !issues.is_empty() {
        log::warn!(
            "{} issue(s) found in {} records; metrics may be skewed",
            issues.len(),
            records.len()
        );
    }

    issues
}

fn is_valid_margin(margin: f64) -> bool {
    margin.is_finite() && (-100.0..=100.0).contains(&margin)
}
