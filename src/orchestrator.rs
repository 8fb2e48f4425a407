//! Comparison orchestrator.
//!
//! [`ComparisonEngine`] is the entry point of the library. It holds the
//! analysis configuration and the reference date and wires the period
//! resolver, comparator, trend analyzer, benchmark evaluator and insight
//! generator together into the four composite operations. The engine keeps
//! no state between calls.

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::periods::PeriodResolver;
use crate::analysis::{benchmark, comparison, insights, trend};
use crate::analysis::{
    AnnualReport, BenchmarkComparison, BenchmarkType, BidRecord, Granularity,
    HistoricalComparison, MetricKind, MultiPeriodComparison, PeriodBoundary, PeriodType,
};
use crate::config::AnalysisConfig;
use crate::source::RecordSource;
use crate::utils::validation::audit_records;

/// Months covered by each metric's trend in the annual report
pub const ANNUAL_TREND_MONTHS: usize = 12;

/// Stateless facade over the analysis components
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    config: AnalysisConfig,
    resolver: PeriodResolver,
}

impl ComparisonEngine {
    /// Engine resolving periods relative to `as_of`
    pub fn new(config: AnalysisConfig, as_of: NaiveDate) -> Self {
        Self {
            config,
            resolver: PeriodResolver::new(as_of),
        }
    }

    /// Engine with default thresholds, resolving periods relative to today
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default(), chrono::Local::now().date_naive())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn as_of(&self) -> NaiveDate {
        self.resolver.as_of()
    }

    /// Compare `metric` between the current and previous period.
    ///
    /// `custom_range` is an inclusive `(start, end)` pair. When given it
    /// overrides the calendar period, and `PeriodType::Custom` requires it.
    pub fn compare_periods(
        &self,
        records: &[BidRecord],
        metric: MetricKind,
        period_type: PeriodType,
        custom_range: Option<(NaiveDate, NaiveDate)>,
    ) -> AnalysisResult<HistoricalComparison> {
        let custom = custom_range
            .map(|(start, end)| PeriodBoundary::new(start, end))
            .transpose()?;

        let result = comparison::compare(
            records,
            metric,
            period_type,
            custom,
            &self.resolver,
            &self.config.comparison,
        )?;
        let insight = insights::for_comparison(metric, &result, &self.config.insights);

        log::info!(
            "{} {}: {:.2} -> {:.2} ({:?})",
            period_type,
            metric,
            result.previous.value,
            result.current.value,
            result.direction
        );

        Ok(HistoricalComparison {
            period_type,
            metric,
            comparison: result,
            insight,
        })
    }

    pub fn compare_year_over_year(
        &self,
        records: &[BidRecord],
        metric: MetricKind,
    ) -> AnalysisResult<HistoricalComparison> {
        self.compare_periods(records, metric, PeriodType::YearOverYear, None)
    }

    pub fn compare_month_over_month(
        &self,
        records: &[BidRecord],
        metric: MetricKind,
    ) -> AnalysisResult<HistoricalComparison> {
        self.compare_periods(records, metric, PeriodType::MonthOverMonth, None)
    }

    /// Trend of `metric` over the last `count` periods, ending with the
    /// period that contains the reference date.
    ///
    /// `count` defaults to `trend.default_periods` from the configuration.
    pub fn compare_multiple_periods(
        &self,
        records: &[BidRecord],
        metric: MetricKind,
        granularity: Granularity,
        count: Option<usize>,
    ) -> AnalysisResult<MultiPeriodComparison> {
        let count = count.unwrap_or(self.config.trend.default_periods);
        self.multi_period(records, metric, granularity, count, &self.resolver)
    }

    fn multi_period(
        &self,
        records: &[BidRecord],
        metric: MetricKind,
        granularity: Granularity,
        count: usize,
        resolver: &PeriodResolver,
    ) -> AnalysisResult<MultiPeriodComparison> {
        let analysis = trend::analyze(
            records,
            metric,
            granularity,
            count,
            resolver,
            &self.config.trend,
        )?;
        let insight = insights::for_trend(
            metric,
            &analysis.characterization,
            analysis.series.len(),
            &self.config.trend,
        );

        Ok(MultiPeriodComparison {
            metric,
            granularity,
            series: analysis.series,
            period_changes: analysis.period_changes,
            regression: analysis.regression,
            characterization: analysis.characterization,
            statistics: analysis.statistics,
            insight,
        })
    }

    /// Measure `metric` over all `records` against a reference value
    pub fn compare_to_benchmark(
        &self,
        records: &[BidRecord],
        metric: MetricKind,
        benchmark_value: f64,
        benchmark_type: BenchmarkType,
    ) -> AnalysisResult<BenchmarkComparison> {
        let result = benchmark::evaluate(
            records,
            metric,
            benchmark_value,
            benchmark_type,
            &self.config.benchmark,
        )?;
        let insight = insights::for_benchmark(metric, &result);

        Ok(BenchmarkComparison {
            metric,
            result,
            insight,
        })
    }

    /// Year-over-year overview plus a monthly trend for each headline metric.
    ///
    /// `year` defaults to the reference date's year. The year is compared
    /// against the year before it. Trends end in December of a past year, or
    /// at the reference date otherwise.
    pub fn generate_annual_report(
        &self,
        records: &[BidRecord],
        year: Option<i32>,
    ) -> AnalysisResult<AnnualReport> {
        let as_of = self.resolver.as_of();
        let year = year.unwrap_or_else(|| as_of.year());
        let (current, previous) = self.resolver.year_over_year_for(year)?;

        let trend_anchor = if year < as_of.year() {
            NaiveDate::from_ymd_opt(year, 12, 31).ok_or(AnalysisError::DateOutOfRange)?
        } else {
            as_of
        };
        let trend_resolver = PeriodResolver::new(trend_anchor);

        log::info!(
            "Generating annual report for {} ({} records, {} metrics)",
            year,
            records.len(),
            MetricKind::ANNUAL_REPORT.len()
        );

        let sections: Vec<(HistoricalComparison, MultiPeriodComparison)> = MetricKind::ANNUAL_REPORT
            .par_iter()
            .map(|&metric| -> AnalysisResult<(HistoricalComparison, MultiPeriodComparison)> {
                let result = comparison::compare_boundaries(
                    records,
                    metric,
                    &current,
                    &previous,
                    &self.config.comparison,
                );
                let overview = HistoricalComparison {
                    period_type: PeriodType::YearOverYear,
                    metric,
                    insight: insights::for_comparison(metric, &result, &self.config.insights),
                    comparison: result,
                };
                let detailed = self.multi_period(
                    records,
                    metric,
                    Granularity::Monthly,
                    ANNUAL_TREND_MONTHS,
                    &trend_resolver,
                )?;
                log::debug!("Annual report section for {} complete", metric);
                Ok((overview, detailed))
            })
            .collect::<AnalysisResult<_>>()?;

        let (overview, detailed): (Vec<_>, Vec<_>) = sections.into_iter().unzip();

        Ok(AnnualReport {
            year,
            insights: insights::overall_insights(&overview, &self.config.insights),
            recommendations: insights::overall_recommendations(&overview, &detailed),
            overview,
            detailed,
        })
    }

    // ------------------------------------------------------------------------
    // Source-backed entry points
    // ------------------------------------------------------------------------

    async fn fetch(&self, source: &dyn RecordSource) -> AnalysisResult<Vec<BidRecord>> {
        let records = source.fetch().await?;
        // Issues are logged, never fatal
        audit_records(&records);
        Ok(records)
    }

    pub async fn compare_periods_from_source(
        &self,
        source: &dyn RecordSource,
        metric: MetricKind,
        period_type: PeriodType,
        custom_range: Option<(NaiveDate, NaiveDate)>,
    ) -> AnalysisResult<HistoricalComparison> {
        let records = self.fetch(source).await?;
        self.compare_periods(&records, metric, period_type, custom_range)
    }

    pub async fn compare_multiple_periods_from_source(
        &self,
        source: &dyn RecordSource,
        metric: MetricKind,
        granularity: Granularity,
        count: Option<usize>,
    ) -> AnalysisResult<MultiPeriodComparison> {
        let records = self.fetch(source).await?;
        self.compare_multiple_periods(&records, metric, granularity, count)
    }

    pub async fn compare_to_benchmark_from_source(
        &self,
        source: &dyn RecordSource,
        metric: MetricKind,
        benchmark_value: f64,
        benchmark_type: BenchmarkType,
    ) -> AnalysisResult<BenchmarkComparison> {
        let records = self.fetch(source).await?;
        self.compare_to_benchmark(&records, metric, benchmark_value, benchmark_type)
    }

    pub async fn generate_annual_report_from_source(
        &self,
        source: &dyn RecordSource,
        year: Option<i32>,
    ) -> AnalysisResult<AnnualReport> {
        let records = self.fetch(source).await?;
        self.generate_annual_report(&records, year)
    }
}
