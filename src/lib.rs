//! # Tender Trends - Historical comparison of tender bid performance
//!
//! This library compares bid performance metrics across time periods,
//! characterizes multi-period trends and measures metrics against
//! benchmarks, producing structured insights for tender management.
//!
//! ## Overview
//!
//! Bid records (submission date, outcome, amount, margin, competitor count,
//! preparation time) are filtered into calendar or custom periods and reduced
//! to metrics such as win rate, average margin and total value. Periods are
//! always resolved against an explicit reference date, so an analysis over the
//! same records is reproducible.
//!
//! ## Key Features
//!
//! - **Period Comparison**: Month, quarter and year over the previous one, or any custom range
//! - **Trend Analysis**: Least-squares trend, volatility and descriptive statistics over consecutive periods
//! - **Benchmarks**: Industry, historical, target or competitor values with a performance rating
//! - **Insights**: Locale-independent insight keys rendered through an English/Arabic text catalog
//! - **Annual Reports**: Year-over-year overview plus monthly trends for the headline metrics
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `analysis`: Metrics, period resolution, comparison, trends, benchmarks, insights and reports
//! - `config`: Analysis thresholds and YAML configuration structures
//! - `config_loader`: Configuration file loading and CLI overrides
//! - `catalog`: Locale text catalog and insight rendering
//! - `source`: Asynchronous record retrieval from files or memory
//! - `orchestrator`: The `ComparisonEngine` facade tying the components together
//! - `utils`: Calendar arithmetic, number formatting and record validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tender_trends::analysis::{BidOutcome, BidRecord, MetricKind};
//! use tender_trends::config::AnalysisConfig;
//! use tender_trends::orchestrator::ComparisonEngine;
//!
//! let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
//! let records = vec![
//!     BidRecord::new("T-1", day(1, 15), BidOutcome::Won, 5_000_000.0, 18.0),
//!     BidRecord::new("T-2", day(2, 15), BidOutcome::Lost, 3_000_000.0, 15.0),
//! ];
//!
//! let engine = ComparisonEngine::new(AnalysisConfig::default(), day(2, 20));
//! let result = engine.compare_month_over_month(&records, MetricKind::TotalValue)?;
//! assert_eq!(result.comparison.percentage_change, -40.0);
//! # Ok::<(), tender_trends::analysis::AnalysisError>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every threshold has a default; a YAML file only names what it changes:
//!
//! ```yaml
//! general:
//!   locale: ar
//!   currency: SAR
//! comparison:
//!   min_sample_size: 5
//! trend:
//!   default_periods: 12
//!   volatility_threshold: 0.3
//! ```
//!
//! ## Error Handling
//!
//! Invalid input (inverted ranges, unknown names, zero period counts,
//! non-finite benchmarks) is reported through `thiserror` enums. Missing data
//! is not an error: empty periods yield zero values and short series yield a
//! stable, weak trend. The CLI and report writers use `color_eyre` for context.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod source;
pub mod utils;
