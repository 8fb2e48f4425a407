//! Core data types for historical bid performance analysis.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::AnalysisError;
use super::insights::{BenchmarkInsight, Insight, InsightKey};

/// Final state of a submitted bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidOutcome {
    Won,
    Lost,
    Pending,
}

/// A bid performance record as supplied by the record source.
///
/// Field names follow the camelCase layout of the tender application's
/// exported records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecord {
    pub id: String,
    pub submission_date: NaiveDate,
    pub outcome: BidOutcome,
    pub bid_amount: f64,
    pub planned_margin: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_margin: Option<f64>,
    #[serde(default)]
    pub competitor_count: u32,
    /// Preparation effort in hours
    #[serde(default)]
    pub preparation_time: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub region: String,
}

impl BidRecord {
    pub fn new(
        id: impl Into<String>,
        submission_date: NaiveDate,
        outcome: BidOutcome,
        bid_amount: f64,
        planned_margin: f64,
    ) -> Self {
        Self {
            id: id.into(),
            submission_date,
            outcome,
            bid_amount,
            planned_margin,
            actual_margin: None,
            competitor_count: 0,
            preparation_time: 0.0,
            category: String::new(),
            region: String::new(),
        }
    }

    pub fn with_competitor_count(mut self, count: u32) -> Self {
        self.competitor_count = count;
        self
    }

    pub fn with_preparation_time(mut self, hours: f64) -> Self {
        self.preparation_time = hours;
        self
    }

    pub fn is_won(&self) -> bool {
        self.outcome == BidOutcome::Won
    }
}

impl AsRef<BidRecord> for BidRecord {
    fn as_ref(&self) -> &BidRecord {
        self
    }
}

/// Strip separators and case so `win-rate`, `win_rate` and `winRate` parse alike.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Metric reduced from a set of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    WinRate,
    AverageMargin,
    TotalValue,
    BidCount,
    AverageBidValue,
    CompetitorCount,
    PreparationTime,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::WinRate,
        MetricKind::AverageMargin,
        MetricKind::TotalValue,
        MetricKind::BidCount,
        MetricKind::AverageBidValue,
        MetricKind::CompetitorCount,
        MetricKind::PreparationTime,
    ];

    /// Metrics covered by the annual report, in report order.
    pub const ANNUAL_REPORT: [MetricKind; 4] = [
        MetricKind::WinRate,
        MetricKind::AverageMargin,
        MetricKind::TotalValue,
        MetricKind::BidCount,
    ];

    /// Higher values are better for win rate, margin and total value.
    /// Every other metric is treated as lower-is-better.
    pub fn is_positive_oriented(self) -> bool {
        matches!(
            self,
            MetricKind::WinRate | MetricKind::AverageMargin | MetricKind::TotalValue
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::WinRate => "win_rate",
            MetricKind::AverageMargin => "average_margin",
            MetricKind::TotalValue => "total_value",
            MetricKind::BidCount => "bid_count",
            MetricKind::AverageBidValue => "average_bid_value",
            MetricKind::CompetitorCount => "competitor_count",
            MetricKind::PreparationTime => "preparation_time",
        }
    }

    /// Catalog key of the metric's display name
    pub fn label_key(self) -> &'static str {
        match self {
            MetricKind::WinRate => "metric.win_rate",
            MetricKind::AverageMargin => "metric.average_margin",
            MetricKind::TotalValue => "metric.total_value",
            MetricKind::BidCount => "metric.bid_count",
            MetricKind::AverageBidValue => "metric.average_bid_value",
            MetricKind::CompetitorCount => "metric.competitor_count",
            MetricKind::PreparationTime => "metric.preparation_time",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "winrate" => Ok(MetricKind::WinRate),
            "averagemargin" | "margin" => Ok(MetricKind::AverageMargin),
            "totalvalue" => Ok(MetricKind::TotalValue),
            "bidcount" => Ok(MetricKind::BidCount),
            "averagebidvalue" => Ok(MetricKind::AverageBidValue),
            "competitorcount" => Ok(MetricKind::CompetitorCount),
            "preparationtime" => Ok(MetricKind::PreparationTime),
            _ => Err(AnalysisError::UnknownMetric(s.to_string())),
        }
    }
}

/// Kind of two-period comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodType {
    MonthOverMonth,
    QuarterOverQuarter,
    YearOverYear,
    Custom,
}

impl PeriodType {
    /// Calendar granularity backing this comparison, `None` for custom ranges.
    pub fn granularity(self) -> Option<Granularity> {
        match self {
            PeriodType::MonthOverMonth => Some(Granularity::Monthly),
            PeriodType::QuarterOverQuarter => Some(Granularity::Quarterly),
            PeriodType::YearOverYear => Some(Granularity::Yearly),
            PeriodType::Custom => None,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodType::MonthOverMonth => "month-over-month",
            PeriodType::QuarterOverQuarter => "quarter-over-quarter",
            PeriodType::YearOverYear => "year-over-year",
            PeriodType::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for PeriodType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "monthovermonth" | "mom" => Ok(PeriodType::MonthOverMonth),
            "quarteroverquarter" | "qoq" => Ok(PeriodType::QuarterOverQuarter),
            "yearoveryear" | "yoy" => Ok(PeriodType::YearOverYear),
            "custom" => Ok(PeriodType::Custom),
            _ => Err(AnalysisError::UnknownPeriod(s.to_string())),
        }
    }
}

/// Calendar unit of a trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    /// Length of one period in calendar months
    pub fn months(self) -> u32 {
        match self {
            Granularity::Monthly => 1,
            Granularity::Quarterly => 3,
            Granularity::Yearly => 12,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "monthly" | "month" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" => Ok(Granularity::Quarterly),
            "yearly" | "year" | "annual" => Ok(Granularity::Yearly),
            _ => Err(AnalysisError::UnknownGranularity(s.to_string())),
        }
    }
}

/// Inclusive date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoundary")]
pub struct PeriodBoundary {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawBoundary {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawBoundary> for PeriodBoundary {
    type Error = AnalysisError;

    fn try_from(raw: RawBoundary) -> Result<Self, Self::Error> {
        PeriodBoundary::new(raw.start, raw.end)
    }
}

impl PeriodBoundary {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalysisError> {
        if start > end {
            return Err(AnalysisError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both ends are inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for PeriodBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Metric value observed over one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub label: String,
    pub boundary: PeriodBoundary,
    pub value: f64,
    pub record_count: usize,
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Stable,
}

/// Outcome of comparing one metric across two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub current: PeriodSnapshot,
    pub previous: PeriodSnapshot,
    pub absolute_change: f64,
    pub percentage_change: f64,
    pub direction: ChangeDirection,
    /// Sample-size heuristic in [0, 1], not a hypothesis test
    pub significance: f64,
    /// `significance * 100`
    pub confidence: f64,
}

/// Change between two adjacent entries of a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub label: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    Volatile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
}

/// Shape of a trend series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendCharacterization {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// `max(0, 1 - volatility)`
    pub consistency: f64,
    /// Coefficient of variation of the series values
    pub volatility: f64,
}

impl TrendCharacterization {
    /// Result reported when a series is too short to characterize.
    pub fn insufficient_data() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: TrendStrength::Weak,
            consistency: 0.0,
            volatility: 0.0,
        }
    }
}

/// Ordinary least-squares fit of `(index, value)` pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Descriptive statistics of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub standard_deviation: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// What a benchmark value represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkType {
    Industry,
    Historical,
    #[default]
    Target,
    Competitor,
}

impl BenchmarkType {
    pub fn label_key(self) -> &'static str {
        match self {
            BenchmarkType::Industry => "benchmark_type.industry",
            BenchmarkType::Historical => "benchmark_type.historical",
            BenchmarkType::Target => "benchmark_type.target",
            BenchmarkType::Competitor => "benchmark_type.competitor",
        }
    }
}

impl FromStr for BenchmarkType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "industry" => Ok(BenchmarkType::Industry),
            "historical" => Ok(BenchmarkType::Historical),
            "target" => Ok(BenchmarkType::Target),
            "competitor" => Ok(BenchmarkType::Competitor),
            _ => Err(AnalysisError::UnknownBenchmarkType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    Above,
    Below,
    At,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Average,
    Poor,
}

/// Metric value measured against a reference value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub current: f64,
    pub benchmark: f64,
    pub benchmark_type: BenchmarkType,
    pub difference: f64,
    pub percentage_difference: f64,
    pub status: BenchmarkStatus,
    pub rating: PerformanceRating,
}

// ============================================================================
// Composite results returned by the engine
// ============================================================================

/// Two-period comparison with its insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalComparison {
    pub period_type: PeriodType,
    pub metric: MetricKind,
    pub comparison: ComparisonResult,
    pub insight: Insight,
}

/// Trend across consecutive calendar periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPeriodComparison {
    pub metric: MetricKind,
    pub granularity: Granularity,
    /// Chronological, oldest first
    pub series: Vec<PeriodSnapshot>,
    pub period_changes: Vec<PeriodChange>,
    pub regression: Option<RegressionFit>,
    pub characterization: TrendCharacterization,
    pub statistics: SeriesStatistics,
    pub insight: Insight,
}

/// Benchmark evaluation with its insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub metric: MetricKind,
    pub result: BenchmarkResult,
    pub insight: BenchmarkInsight,
}

/// Year-over-year overview and monthly trends for the headline metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualReport {
    pub year: i32,
    pub overview: Vec<HistoricalComparison>,
    pub detailed: Vec<MultiPeriodComparison>,
    /// Cross-metric insights
    pub insights: Vec<Insight>,
    /// Report-wide recommendations; per-metric ones stay on each insight
    pub recommendations: Vec<InsightKey>,
}
