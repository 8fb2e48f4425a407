//! Report generation for bid performance analysis.
//!
//! Generates both JSON and human-readable text reports. JSON reports carry
//! the raw results with abstract insight keys; text reports resolve those
//! keys through a [`TextCatalog`] in the report's locale.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use super::insights::Insight;
use super::types::*;
use crate::catalog::{metric_label, render_benchmark_insight, render_insight, render_key, TextCatalog};
use crate::utils::format::{format_metric_value, format_percentage};

/// Metadata about the analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub analysis_timestamp: String,
    /// Reference date periods were resolved against
    pub as_of: NaiveDate,
    pub record_source: String,
    pub total_records: usize,
    pub locale: String,
    pub currency: String,
}

/// Result carried by a report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Comparison(HistoricalComparison),
    Trend(MultiPeriodComparison),
    Benchmark(BenchmarkComparison),
    Annual(AnnualReport),
}

impl ReportBody {
    /// Base file name for the report's output files
    pub fn name(&self) -> &'static str {
        match self {
            ReportBody::Comparison(_) => "comparison",
            ReportBody::Trend(_) => "trend",
            ReportBody::Benchmark(_) => "benchmark",
            ReportBody::Annual(_) => "annual_report",
        }
    }
}

/// Complete report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub result: ReportBody,
}

/// Generate JSON report
pub fn generate_json_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Generate human-readable text report
pub fn generate_text_report(
    report: &AnalysisReport,
    catalog: &dyn TextCatalog,
    output_path: &Path,
) -> Result<()> {
    let content = render_text_report(report, catalog);
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Catalog keys of the text report's own labels
pub(crate) mod labels {
    pub const TITLE: &str = "report.title";
    pub const ANALYSIS_DATE: &str = "report.analysis_date";
    pub const REFERENCE_DATE: &str = "report.reference_date";
    pub const RECORD_SOURCE: &str = "report.record_source";
    pub const RECORDS: &str = "report.records";
    pub const RECORD_COUNT: &str = "report.record_count";
    pub const PERIOD_COMPARISON: &str = "report.period_comparison";
    pub const TREND: &str = "report.trend";
    pub const BENCHMARK_COMPARISON: &str = "report.benchmark_comparison";
    pub const ANNUAL_REPORT: &str = "report.annual_report";
    pub const METRIC: &str = "report.metric";
    pub const CURRENT: &str = "report.current";
    pub const PREVIOUS: &str = "report.previous";
    pub const CHANGE: &str = "report.change";
    pub const CONFIDENCE: &str = "report.confidence";
    pub const INSIGHT: &str = "report.insight";
    pub const SIGNIFICANCE: &str = "report.significance";
    pub const PERIOD: &str = "report.period";
    pub const VALUE: &str = "report.value";
    pub const DIRECTION: &str = "report.direction";
    pub const VOLATILITY: &str = "report.volatility";
    pub const CONSISTENCY: &str = "report.consistency";
    pub const BENCHMARK: &str = "report.benchmark";
    pub const DIFFERENCE: &str = "report.difference";
    pub const YEAR_OVER_YEAR: &str = "report.year_over_year";
    pub const MONTHLY_TRENDS: &str = "report.monthly_trends";
    pub const KEY_INSIGHTS: &str = "report.key_insights";
    pub const RECOMMENDATIONS: &str = "report.recommendations";

    pub const ALL: &[&str] = &[
        TITLE,
        ANALYSIS_DATE,
        REFERENCE_DATE,
        RECORD_SOURCE,
        RECORDS,
        RECORD_COUNT,
        PERIOD_COMPARISON,
        TREND,
        BENCHMARK_COMPARISON,
        ANNUAL_REPORT,
        METRIC,
        CURRENT,
        PREVIOUS,
        CHANGE,
        CONFIDENCE,
        INSIGHT,
        SIGNIFICANCE,
        PERIOD,
        VALUE,
        DIRECTION,
        VOLATILITY,
        CONSISTENCY,
        BENCHMARK,
        DIFFERENCE,
        YEAR_OVER_YEAR,
        MONTHLY_TRENDS,
        KEY_INSIGHTS,
        RECOMMENDATIONS,
    ];
}

/// Locale-aware formatting shared by the text sections
struct TextContext<'a> {
    catalog: &'a dyn TextCatalog,
    locale: &'a str,
    currency: &'a str,
}

impl TextContext<'_> {
    fn label(&self, key: &str) -> String {
        self.catalog.text(self.locale, key)
    }

    fn metric(&self, metric: MetricKind) -> String {
        metric_label(self.catalog, self.locale, metric)
    }

    fn value(&self, metric: MetricKind, value: f64) -> String {
        format_metric_value(value, metric, self.currency)
    }

    fn insight(&self, lines: &mut Vec<String>, insight: &Insight) {
        let rendered = render_insight(insight, self.catalog, self.locale);
        lines.push(format!("  {}", rendered.summary));
        lines.push(format!("  {}", rendered.interpretation));
        lines.push(format!("  {}: {}", self.label(labels::SIGNIFICANCE), rendered.significance));
        for recommendation in &rendered.recommendations {
            lines.push(format!("    - {}", recommendation));
        }
    }
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(80));
    lines.push(format!("{:^80}", title.to_uppercase()));
    lines.push("=".repeat(80));
    lines.push(String::new());
}

fn signed_percentage(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_percentage(value))
    } else {
        format_percentage(value)
    }
}

/// Render the text report without writing it
pub fn render_text_report(report: &AnalysisReport, catalog: &dyn TextCatalog) -> String {
    let ctx = TextContext {
        catalog,
        locale: &report.metadata.locale,
        currency: &report.metadata.currency,
    };
    let mut lines: Vec<String> = Vec::new();

    // Header
    section(&mut lines, &ctx.label(labels::TITLE));

    // Metadata
    let meta = &report.metadata;
    lines.push(format!("{}: {}", ctx.label(labels::ANALYSIS_DATE), meta.analysis_timestamp));
    lines.push(format!("{}: {}", ctx.label(labels::REFERENCE_DATE), meta.as_of));
    lines.push(format!("{}: {}", ctx.label(labels::RECORD_SOURCE), meta.record_source));
    lines.push(format!("{}: {}", ctx.label(labels::RECORDS), meta.total_records));
    lines.push(String::new());

    match &report.result {
        ReportBody::Comparison(comparison) => write_comparison(&mut lines, &ctx, comparison),
        ReportBody::Trend(trend) => write_trend(&mut lines, &ctx, trend),
        ReportBody::Benchmark(benchmark) => write_benchmark(&mut lines, &ctx, benchmark),
        ReportBody::Annual(annual) => write_annual(&mut lines, &ctx, annual),
    }

    // Footer
    lines.push("=".repeat(80));
    lines.join("\n")
}

fn write_comparison(lines: &mut Vec<String>, ctx: &TextContext, comparison: &HistoricalComparison) {
    let metric = comparison.metric;
    let result = &comparison.comparison;
    section(
        lines,
        &format!("{} ({})", ctx.label(labels::PERIOD_COMPARISON), comparison.period_type),
    );

    lines.push(format!("{}: {}", ctx.label(labels::METRIC), ctx.metric(metric)));
    let record_count = ctx.label(labels::RECORD_COUNT);
    for (label, snapshot) in [(labels::CURRENT, &result.current), (labels::PREVIOUS, &result.previous)] {
        lines.push(format!(
            "  {:<10} {:<24} {:>20} ({} {})",
            ctx.label(label),
            snapshot.label,
            ctx.value(metric, snapshot.value),
            snapshot.record_count,
            record_count
        ));
    }
    lines.push(format!(
        "  {}: {} ({:?})",
        ctx.label(labels::CHANGE),
        signed_percentage(result.percentage_change),
        result.direction
    ));
    lines.push(format!("  {}: {:.0}%", ctx.label(labels::CONFIDENCE), result.confidence));
    lines.push(String::new());

    lines.push(format!("{}:", ctx.label(labels::INSIGHT)));
    ctx.insight(lines, &comparison.insight);
    lines.push(String::new());
}

fn write_trend(lines: &mut Vec<String>, ctx: &TextContext, trend: &MultiPeriodComparison) {
    let metric = trend.metric;
    section(lines, &format!("{} ({})", ctx.label(labels::TREND), trend.granularity));

    lines.push(format!("{}: {}", ctx.label(labels::METRIC), ctx.metric(metric)));
    lines.push(String::new());
    lines.push(format!(
        "  {:<24} {:>20} {:>10}",
        ctx.label(labels::PERIOD),
        ctx.label(labels::VALUE),
        ctx.label(labels::CHANGE)
    ));
    for (i, snapshot) in trend.series.iter().enumerate() {
        // period_changes[i - 1] describes the move into series[i]
        let change = i
            .checked_sub(1)
            .and_then(|prev| trend.period_changes.get(prev))
            .map(|c| signed_percentage(c.change_percent))
            .unwrap_or_default();
        lines.push(format!(
            "  {:<24} {:>20} {:>10}",
            snapshot.label,
            ctx.value(metric, snapshot.value),
            change
        ));
    }
    lines.push(String::new());

    let shape = &trend.characterization;
    lines.push(format!(
        "{}: {:?} ({:?})",
        ctx.label(labels::DIRECTION),
        shape.direction,
        shape.strength
    ));
    lines.push(format!(
        "  {}: {:.2}, {}: {:.2}",
        ctx.label(labels::VOLATILITY),
        shape.volatility,
        ctx.label(labels::CONSISTENCY),
        shape.consistency
    ));
    // Statistical notation stays untranslated
    if let Some(fit) = &trend.regression {
        lines.push(format!(
            "  Slope: {:.3} per period, R²: {:.3}",
            fit.slope, fit.r_squared
        ));
    }

    let stats = &trend.statistics;
    lines.push(format!(
        "  Mean: {}, median: {}, std dev: {:.2}",
        ctx.value(metric, stats.mean),
        ctx.value(metric, stats.median),
        stats.standard_deviation
    ));
    lines.push(format!(
        "  Min: {}, max: {}, range: {}",
        ctx.value(metric, stats.min),
        ctx.value(metric, stats.max),
        ctx.value(metric, stats.range)
    ));
    lines.push(String::new());

    lines.push(format!("{}:", ctx.label(labels::INSIGHT)));
    ctx.insight(lines, &trend.insight);
    lines.push(String::new());
}

fn write_benchmark(lines: &mut Vec<String>, ctx: &TextContext, benchmark: &BenchmarkComparison) {
    let metric = benchmark.metric;
    let result = &benchmark.result;
    section(lines, &ctx.label(labels::BENCHMARK_COMPARISON));

    lines.push(format!("{}: {}", ctx.label(labels::METRIC), ctx.metric(metric)));
    lines.push(format!("  {}: {}", ctx.label(labels::CURRENT), ctx.value(metric, result.current)));
    lines.push(format!(
        "  {}: {} ({})",
        ctx.label(labels::BENCHMARK),
        ctx.value(metric, result.benchmark),
        ctx.label(result.benchmark_type.label_key())
    ));
    lines.push(format!(
        "  {}: {} ({:?}, {:?})",
        ctx.label(labels::DIFFERENCE),
        signed_percentage(result.percentage_difference),
        result.status,
        result.rating
    ));
    lines.push(String::new());

    let rendered = render_benchmark_insight(&benchmark.insight, ctx.catalog, ctx.locale);
    lines.push(format!("{}:", ctx.label(labels::INSIGHT)));
    lines.push(format!("  {}", rendered.summary));
    lines.push(format!("  {}", rendered.analysis));
    for action in &rendered.actions {
        lines.push(format!("    - {}", action));
    }
    lines.push(String::new());
}

fn write_annual(lines: &mut Vec<String>, ctx: &TextContext, report: &AnnualReport) {
    section(lines, &format!("{} {}", ctx.label(labels::ANNUAL_REPORT), report.year));

    lines.push(format!(
        "{} ({} / {}):",
        ctx.label(labels::YEAR_OVER_YEAR),
        report.year,
        report.year - 1
    ));
    for comparison in &report.overview {
        let metric = comparison.metric;
        let result = &comparison.comparison;
        lines.push(format!(
            "  {:<24} {:>20} -> {:>20} {:>10}",
            ctx.metric(metric),
            ctx.value(metric, result.previous.value),
            ctx.value(metric, result.current.value),
            signed_percentage(result.percentage_change)
        ));
    }
    lines.push(String::new());

    lines.push(format!("{}:", ctx.label(labels::MONTHLY_TRENDS)));
    for trend in &report.detailed {
        let rendered = render_insight(&trend.insight, ctx.catalog, ctx.locale);
        lines.push(format!(
            "  {:<24} {:?}, {:?} ({} {:.2})",
            ctx.metric(trend.metric),
            trend.characterization.direction,
            trend.characterization.strength,
            ctx.label(labels::VOLATILITY),
            trend.characterization.volatility
        ));
        lines.push(format!("    {}", rendered.summary));
    }
    lines.push(String::new());

    lines.push(format!("{}:", ctx.label(labels::KEY_INSIGHTS)));
    for insight in &report.insights {
        let text = render_key(ctx.catalog, ctx.locale, insight.summary_key, insight.metric, insight.magnitude);
        lines.push(format!("  - {}", text));
    }
    for comparison in &report.overview {
        let rendered = render_insight(&comparison.insight, ctx.catalog, ctx.locale);
        lines.push(format!("  - {}", rendered.summary));
    }
    lines.push(String::new());

    lines.push(format!("{}:", ctx.label(labels::RECOMMENDATIONS)));
    for (i, key) in report.recommendations.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, ctx.label(key.as_str())));
    }
    lines.push(String::new());
}

/// Print a summary to stdout
pub fn print_summary(report: &AnalysisReport, catalog: &dyn TextCatalog) {
    let ctx = TextContext {
        catalog,
        locale: &report.metadata.locale,
        currency: &report.metadata.currency,
    };

    println!("\n=== {} ===\n", ctx.label(labels::TITLE).to_uppercase());
    println!("{}: {}", ctx.label(labels::RECORDS), report.metadata.total_records);
    println!("{}: {}", ctx.label(labels::REFERENCE_DATE), report.metadata.as_of);

    match &report.result {
        ReportBody::Comparison(comparison) => {
            let result = &comparison.comparison;
            println!("\n{} ({}):", ctx.metric(comparison.metric), comparison.period_type);
            println!("  {}: {}", result.previous.label, ctx.value(comparison.metric, result.previous.value));
            println!("  {}: {}", result.current.label, ctx.value(comparison.metric, result.current.value));
            println!("  {}: {}", ctx.label(labels::CHANGE), signed_percentage(result.percentage_change));
        }
        ReportBody::Trend(trend) => {
            println!("\n{} ({} x {}):", ctx.metric(trend.metric), trend.series.len(), trend.granularity);
            println!(
                "  {:?}, {:?}, {} {:.2}",
                trend.characterization.direction,
                trend.characterization.strength,
                ctx.label(labels::VOLATILITY),
                trend.characterization.volatility
            );
        }
        ReportBody::Benchmark(benchmark) => {
            let result = &benchmark.result;
            println!("\n{}:", ctx.metric(benchmark.metric));
            println!(
                "  {} vs {}: {} ({:?})",
                ctx.value(benchmark.metric, result.current),
                ctx.value(benchmark.metric, result.benchmark),
                signed_percentage(result.percentage_difference),
                result.rating
            );
        }
        ReportBody::Annual(annual) => {
            println!("\n{} {}:", ctx.label(labels::ANNUAL_REPORT), annual.year);
            for comparison in &annual.overview {
                println!(
                    "  {}: {}",
                    ctx.metric(comparison.metric),
                    signed_percentage(comparison.comparison.percentage_change)
                );
            }
            println!("  {}: {}", ctx.label(labels::RECOMMENDATIONS), annual.recommendations.len());
        }
    }

    println!();
}
