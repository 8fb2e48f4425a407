//! Shared utilities: calendar arithmetic, number formatting, record validation.

pub mod dates;
pub mod format;
pub mod validation;

pub use format::{format_currency, format_percentage};
pub use validation::{audit_records, RecordIssue};
