//! Insight generation.
//!
//! Turns numeric comparison, trend and benchmark results into abstract
//! insight keys. Nothing here produces display text: keys are rendered per
//! locale by [`crate::catalog`]. Every function is pure, so the same input
//! always yields the same insight.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::*;
use crate::config::{InsightSettings, TrendSettings};

macro_rules! insight_keys {
    ($($variant:ident => $key:tt,)*) => {
        /// Identifier of a piece of insight text, resolved by a text catalog
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum InsightKey {
            $(
                #[serde(rename = $key)]
                $variant,
            )*
        }

        impl InsightKey {
            pub const ALL: &'static [InsightKey] = &[$(InsightKey::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(InsightKey::$variant => $key,)*
                }
            }
        }
    };
}

insight_keys! {
    SummaryIncrease => "summary.increase",
    SummaryDecrease => "summary.decrease",
    SummaryStable => "summary.stable",

    PerformanceImproved => "interpretation.performance_improved",
    IndicatorIncreased => "interpretation.indicator_increased",
    PerformanceDeclined => "interpretation.performance_declined",
    IndicatorDecreased => "interpretation.indicator_decreased",
    PerformanceStable => "interpretation.performance_stable",

    TrendIncreasing => "trend.increasing",
    TrendDecreasing => "trend.decreasing",
    TrendStable => "trend.stable",
    TrendVolatile => "trend.volatile",
    TrendStrong => "trend.strength_strong",
    TrendModerate => "trend.strength_moderate",
    TrendWeak => "trend.strength_weak",
    TrendInsufficientData => "trend.insufficient_data",

    BenchmarkAbove => "benchmark.above",
    BenchmarkBelow => "benchmark.below",
    BenchmarkAt => "benchmark.at",
    RatingExcellent => "benchmark.rating_excellent",
    RatingGood => "benchmark.rating_good",
    RatingAverage => "benchmark.rating_average",
    RatingPoor => "benchmark.rating_poor",

    ReviewBidStrategy => "recommendation.review_bid_strategy",
    AnalyzeDeclineCauses => "recommendation.analyze_decline_causes",
    ContinueCurrentStrategy => "recommendation.continue_current_strategy",
    DocumentBestPractices => "recommendation.document_best_practices",
    MonitorVolatility => "recommendation.monitor_volatility",
    StabilizeVolatileMetrics => "recommendation.stabilize_volatile_metrics",
    ReviewDecliningMetrics => "recommendation.review_declining_metrics",
    ContinuousMonitoring => "recommendation.continuous_monitoring",

    UrgentImprovementPlan => "action.urgent_improvement_plan",
    AnalyzeGaps => "action.analyze_gaps",
    RaisePerformance => "action.raise_performance",
    MaintainExcellence => "action.maintain_excellence",
    ShareBestPractices => "action.share_best_practices",

    OverallImproved => "overall.improved",
    OverallDeclined => "overall.declined",
    OverallMixed => "overall.mixed",
    OverallHighSignificance => "overall.high_significance",
}

impl fmt::Display for InsightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignificanceLevel {
    High,
    Medium,
    Low,
}

impl SignificanceLevel {
    pub fn label_key(self) -> &'static str {
        match self {
            SignificanceLevel::High => "significance.high",
            SignificanceLevel::Medium => "significance.medium",
            SignificanceLevel::Low => "significance.low",
        }
    }
}

/// Structured insight attached to a comparison or trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub summary_key: InsightKey,
    pub interpretation_key: InsightKey,
    pub significance_level: SignificanceLevel,
    pub recommendation_keys: Vec<InsightKey>,
    /// Metric the insight talks about, `None` for cross-metric insights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricKind>,
    /// Magnitude interpolated into templates: an absolute percentage for
    /// comparisons and trends, a count for cross-metric insights
    pub magnitude: f64,
}

/// Structured insight attached to a benchmark evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkInsight {
    pub summary_key: InsightKey,
    pub analysis_key: InsightKey,
    pub action_keys: Vec<InsightKey>,
    pub metric: MetricKind,
    /// Absolute percentage difference from the benchmark
    pub magnitude: f64,
}

pub fn significance_level(significance: f64, settings: &InsightSettings) -> SignificanceLevel {
    if significance > settings.high_significance {
        SignificanceLevel::High
    } else if significance > settings.medium_significance {
        SignificanceLevel::Medium
    } else {
        SignificanceLevel::Low
    }
}

/// Insight for a two-period comparison
pub fn for_comparison(
    metric: MetricKind,
    result: &ComparisonResult,
    settings: &InsightSettings,
) -> Insight {
    let positive = metric.is_positive_oriented();

    let (summary_key, interpretation_key) = match result.direction {
        ChangeDirection::Increase if positive => {
            (InsightKey::SummaryIncrease, InsightKey::PerformanceImproved)
        }
        ChangeDirection::Increase => (InsightKey::SummaryIncrease, InsightKey::IndicatorIncreased),
        ChangeDirection::Decrease if positive => {
            (InsightKey::SummaryDecrease, InsightKey::PerformanceDeclined)
        }
        ChangeDirection::Decrease => (InsightKey::SummaryDecrease, InsightKey::IndicatorDecreased),
        ChangeDirection::Stable => (InsightKey::SummaryStable, InsightKey::PerformanceStable),
    };

    let mut recommendation_keys = Vec::new();
    if positive {
        match result.direction {
            ChangeDirection::Decrease => recommendation_keys
                .extend([InsightKey::ReviewBidStrategy, InsightKey::AnalyzeDeclineCauses]),
            ChangeDirection::Increase => recommendation_keys
                .extend([InsightKey::ContinueCurrentStrategy, InsightKey::DocumentBestPractices]),
            ChangeDirection::Stable => {}
        }
    }
    if result.percentage_change.abs() > settings.large_change_percent {
        recommendation_keys.push(InsightKey::MonitorVolatility);
    }

    Insight {
        summary_key,
        interpretation_key,
        significance_level: significance_level(result.significance, settings),
        recommendation_keys,
        metric: Some(metric),
        magnitude: result.percentage_change.abs(),
    }
}

/// Insight for a trend series of `points` entries.
///
/// Significance follows the fit quality: a strong fit is high significance.
pub fn for_trend(
    metric: MetricKind,
    characterization: &TrendCharacterization,
    points: usize,
    settings: &TrendSettings,
) -> Insight {
    if points < settings.min_points {
        return Insight {
            summary_key: InsightKey::TrendStable,
            interpretation_key: InsightKey::TrendInsufficientData,
            significance_level: SignificanceLevel::Low,
            recommendation_keys: Vec::new(),
            metric: Some(metric),
            magnitude: 0.0,
        };
    }

    let positive = metric.is_positive_oriented();
    let (summary_key, recommendation_keys) = match characterization.direction {
        TrendDirection::Increasing if positive => {
            (InsightKey::TrendIncreasing, vec![InsightKey::ContinueCurrentStrategy])
        }
        TrendDirection::Increasing => (InsightKey::TrendIncreasing, Vec::new()),
        TrendDirection::Decreasing if positive => {
            (InsightKey::TrendDecreasing, vec![InsightKey::ReviewBidStrategy])
        }
        TrendDirection::Decreasing => (InsightKey::TrendDecreasing, Vec::new()),
        TrendDirection::Stable => (InsightKey::TrendStable, Vec::new()),
        TrendDirection::Volatile => {
            (InsightKey::TrendVolatile, vec![InsightKey::StabilizeVolatileMetrics])
        }
    };

    let (interpretation_key, significance_level) = match characterization.strength {
        TrendStrength::Strong => (InsightKey::TrendStrong, SignificanceLevel::High),
        TrendStrength::Moderate => (InsightKey::TrendModerate, SignificanceLevel::Medium),
        TrendStrength::Weak => (InsightKey::TrendWeak, SignificanceLevel::Low),
    };

    Insight {
        summary_key,
        interpretation_key,
        significance_level,
        recommendation_keys,
        metric: Some(metric),
        magnitude: characterization.volatility * 100.0,
    }
}

/// Insight for a benchmark evaluation
pub fn for_benchmark(metric: MetricKind, result: &BenchmarkResult) -> BenchmarkInsight {
    let summary_key = match result.status {
        BenchmarkStatus::Above => InsightKey::BenchmarkAbove,
        BenchmarkStatus::Below => InsightKey::BenchmarkBelow,
        BenchmarkStatus::At => InsightKey::BenchmarkAt,
    };

    let (analysis_key, action_keys) = match result.rating {
        PerformanceRating::Excellent => (
            InsightKey::RatingExcellent,
            vec![InsightKey::MaintainExcellence, InsightKey::ShareBestPractices],
        ),
        PerformanceRating::Good => (InsightKey::RatingGood, Vec::new()),
        PerformanceRating::Average => (InsightKey::RatingAverage, vec![InsightKey::RaisePerformance]),
        PerformanceRating::Poor => (
            InsightKey::RatingPoor,
            vec![InsightKey::UrgentImprovementPlan, InsightKey::AnalyzeGaps],
        ),
    };

    BenchmarkInsight {
        summary_key,
        analysis_key,
        action_keys,
        metric,
        magnitude: result.percentage_difference.abs(),
    }
}

/// Cross-metric insights for a set of comparisons.
///
/// The first insight weighs increases against decreases. A second one is
/// added when any comparison is highly significant, carrying their count.
pub fn overall_insights(overview: &[HistoricalComparison], settings: &InsightSettings) -> Vec<Insight> {
    let count = |direction: ChangeDirection| {
        overview
            .iter()
            .filter(|c| c.comparison.direction == direction)
            .count()
    };
    let increases = count(ChangeDirection::Increase);
    let decreases = count(ChangeDirection::Decrease);

    let summary_key = match increases.cmp(&decreases) {
        std::cmp::Ordering::Greater => InsightKey::OverallImproved,
        std::cmp::Ordering::Less => InsightKey::OverallDeclined,
        std::cmp::Ordering::Equal => InsightKey::OverallMixed,
    };

    let mean_significance = if overview.is_empty() {
        0.0
    } else {
        overview.iter().map(|c| c.comparison.significance).sum::<f64>() / overview.len() as f64
    };

    let mut insights = vec![Insight {
        summary_key,
        interpretation_key: summary_key,
        significance_level: significance_level(mean_significance, settings),
        recommendation_keys: Vec::new(),
        metric: None,
        magnitude: increases.abs_diff(decreases) as f64,
    }];

    let significant = overview
        .iter()
        .filter(|c| c.comparison.significance > settings.high_significance)
        .count();
    if significant > 0 {
        insights.push(Insight {
            summary_key: InsightKey::OverallHighSignificance,
            interpretation_key: InsightKey::OverallHighSignificance,
            significance_level: SignificanceLevel::High,
            recommendation_keys: Vec::new(),
            metric: None,
            magnitude: significant as f64,
        });
    }

    insights
}

/// Report-wide recommendations. Continuous monitoring is always last.
pub fn overall_recommendations(
    overview: &[HistoricalComparison],
    detailed: &[MultiPeriodComparison],
) -> Vec<InsightKey> {
    let mut keys = Vec::new();
    if overview
        .iter()
        .any(|c| c.comparison.direction == ChangeDirection::Decrease)
    {
        keys.push(InsightKey::ReviewDecliningMetrics);
    }
    if detailed
        .iter()
        .any(|t| t.characterization.direction == TrendDirection::Volatile)
    {
        keys.push(InsightKey::StabilizeVolatileMetrics);
    }
    keys.push(InsightKey::ContinuousMonitoring);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn comparison(direction: ChangeDirection, percentage_change: f64, significance: f64) -> ComparisonResult {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let boundary = PeriodBoundary::new(day, day).unwrap();
        let snapshot = PeriodSnapshot {
            label: "2024-01-01..2024-01-01".to_string(),
            boundary,
            value: 0.0,
            record_count: 0,
        };
        ComparisonResult {
            current: snapshot.clone(),
            previous: snapshot,
            absolute_change: percentage_change,
            percentage_change,
            direction,
            significance,
            confidence: significance * 100.0,
        }
    }

    fn historical(metric: MetricKind, direction: ChangeDirection, significance: f64) -> HistoricalComparison {
        let result = comparison(direction, 5.0, significance);
        HistoricalComparison {
            period_type: PeriodType::YearOverYear,
            metric,
            insight: for_comparison(metric, &result, &InsightSettings::default()),
            comparison: result,
        }
    }

    #[test]
    fn test_every_key_is_unique() {
        for (i, a) in InsightKey::ALL.iter().enumerate() {
            for b in &InsightKey::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
        let json = serde_json::to_string(&InsightKey::MonitorVolatility).unwrap();
        assert_eq!(json, "\"recommendation.monitor_volatility\"");
    }

    #[test]
    fn test_decline_on_positive_metric() {
        let settings = InsightSettings::default();
        let insight = for_comparison(
            MetricKind::WinRate,
            &comparison(ChangeDirection::Decrease, -25.0, 0.8),
            &settings,
        );
        assert_eq!(insight.summary_key, InsightKey::SummaryDecrease);
        assert_eq!(insight.interpretation_key, InsightKey::PerformanceDeclined);
        assert_eq!(insight.significance_level, SignificanceLevel::High);
        assert_eq!(
            insight.recommendation_keys,
            vec![
                InsightKey::ReviewBidStrategy,
                InsightKey::AnalyzeDeclineCauses,
                InsightKey::MonitorVolatility
            ]
        );
        assert_eq!(insight.magnitude, 25.0);
    }

    #[test]
    fn test_increase_on_neutral_metric() {
        let insight = for_comparison(
            MetricKind::PreparationTime,
            &comparison(ChangeDirection::Increase, 10.0, 0.5),
            &InsightSettings::default(),
        );
        assert_eq!(insight.interpretation_key, InsightKey::IndicatorIncreased);
        assert_eq!(insight.significance_level, SignificanceLevel::Medium);
        assert!(insight.recommendation_keys.is_empty());
    }

    #[test]
    fn test_insights_are_deterministic() {
        let settings = InsightSettings::default();
        let result = comparison(ChangeDirection::Increase, 30.0, 0.1);
        let first = for_comparison(MetricKind::TotalValue, &result, &settings);
        let second = for_comparison(MetricKind::TotalValue, &result, &settings);
        assert_eq!(first, second);
        assert_eq!(first.significance_level, SignificanceLevel::Low);
        assert_eq!(
            first.recommendation_keys,
            vec![
                InsightKey::ContinueCurrentStrategy,
                InsightKey::DocumentBestPractices,
                InsightKey::MonitorVolatility
            ]
        );
    }

    #[test]
    fn test_trend_insight() {
        let settings = TrendSettings::default();
        let volatile = TrendCharacterization {
            direction: TrendDirection::Volatile,
            strength: TrendStrength::Moderate,
            consistency: 0.6,
            volatility: 0.4,
        };
        let insight = for_trend(MetricKind::BidCount, &volatile, 12, &settings);
        assert_eq!(insight.summary_key, InsightKey::TrendVolatile);
        assert_eq!(insight.interpretation_key, InsightKey::TrendModerate);
        assert_eq!(insight.significance_level, SignificanceLevel::Medium);
        assert_eq!(insight.recommendation_keys, vec![InsightKey::StabilizeVolatileMetrics]);

        let short = for_trend(
            MetricKind::WinRate,
            &TrendCharacterization::insufficient_data(),
            2,
            &settings,
        );
        assert_eq!(short.interpretation_key, InsightKey::TrendInsufficientData);
    }

    #[test]
    fn test_benchmark_actions_follow_rating() {
        let mut result = BenchmarkResult {
            current: 30.0,
            benchmark: 50.0,
            benchmark_type: BenchmarkType::Target,
            difference: -20.0,
            percentage_difference: -40.0,
            status: BenchmarkStatus::Below,
            rating: PerformanceRating::Poor,
        };
        let insight = for_benchmark(MetricKind::WinRate, &result);
        assert_eq!(insight.summary_key, InsightKey::BenchmarkBelow);
        assert_eq!(
            insight.action_keys,
            vec![InsightKey::UrgentImprovementPlan, InsightKey::AnalyzeGaps]
        );
        assert_eq!(insight.magnitude, 40.0);

        result.rating = PerformanceRating::Good;
        assert!(for_benchmark(MetricKind::WinRate, &result).action_keys.is_empty());
    }

    #[test]
    fn test_overall_insights_and_recommendations() {
        let settings = InsightSettings::default();
        let overview = vec![
            historical(MetricKind::WinRate, ChangeDirection::Increase, 0.8),
            historical(MetricKind::AverageMargin, ChangeDirection::Increase, 0.1),
            historical(MetricKind::TotalValue, ChangeDirection::Decrease, 0.1),
        ];
        let insights = overall_insights(&overview, &settings);
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].summary_key, InsightKey::OverallImproved);
        assert_eq!(insights[1].summary_key, InsightKey::OverallHighSignificance);
        assert_eq!(insights[1].magnitude, 1.0);

        assert_eq!(
            overall_recommendations(&overview, &[]),
            vec![InsightKey::ReviewDecliningMetrics, InsightKey::ContinuousMonitoring]
        );

        let mixed = overall_insights(&[], &settings);
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].summary_key, InsightKey::OverallMixed);
    }
}
