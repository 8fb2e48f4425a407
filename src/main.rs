//! Historical bid performance analysis CLI.
//!
//! Loads bid records from a JSON or YAML file, runs one analysis and writes
//! `<name>.json` and `<name>.txt` reports to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use env_logger::Env;

use tender_trends::analysis::report::{
    generate_json_report, generate_text_report, print_summary, AnalysisReport, ReportBody,
    ReportMetadata,
};
use tender_trends::analysis::{BenchmarkType, Granularity, MetricKind, PeriodType};
use tender_trends::catalog::MapCatalog;
use tender_trends::config_loader::{apply_overrides, load_config_or_default, CliOverrides};
use tender_trends::orchestrator::ComparisonEngine;
use tender_trends::source::{FileRecordSource, RecordSource};
use tender_trends::utils::validation::audit_records;

#[derive(Parser)]
#[command(name = "tender-trends")]
#[command(about = "Historical comparison and trend analysis of tender bid performance")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bid records file (.json, .yaml or .yml)
    #[arg(short, long, default_value = "records.json")]
    records: PathBuf,

    /// Analysis configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional text catalog layered over the built-in one (YAML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Reference date periods are resolved against (YYYY-MM-DD, default today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Locale of the text report (en, ar)
    #[arg(short, long)]
    locale: Option<String>,

    /// Output directory for reports
    #[arg(short, long, default_value = "analysis_output")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a metric between the current and previous period
    Compare {
        #[arg(short, long)]
        metric: MetricKind,

        /// month-over-month, quarter-over-quarter, year-over-year or custom
        #[arg(short, long, default_value = "month-over-month")]
        period: PeriodType,

        /// Start of a custom current period (requires --end)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        /// End of a custom current period (requires --start)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },

    /// Analyze a metric's trend over consecutive periods
    Trend {
        #[arg(short, long)]
        metric: MetricKind,

        /// monthly, quarterly or yearly
        #[arg(short, long, default_value = "monthly")]
        granularity: Granularity,

        /// Number of periods (default from configuration)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Compare a metric against a benchmark value
    Benchmark {
        #[arg(short, long)]
        metric: MetricKind,

        #[arg(short, long)]
        value: f64,

        /// industry, historical, target or competitor
        #[arg(short, long, default_value = "target")]
        kind: BenchmarkType,
    },

    /// Year-over-year overview with monthly trends for the headline metrics
    Annual {
        /// Calendar year (default: the reference date's year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Configuration is read first so its log level can apply
    let mut config = load_config_or_default(cli.config.as_deref())?;
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    apply_overrides(
        &mut config,
        &CliOverrides {
            locale: cli.locale.clone(),
        },
    )?;

    // Set thread pool size
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let mut catalog = MapCatalog::builtin();
    if let Some(path) = &cli.catalog {
        catalog.merge(MapCatalog::from_path(path)?);
    }

    // Load records
    let source = FileRecordSource::new(&cli.records);
    let records = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load records from {}", cli.records.display()))?;
    audit_records(&records);

    let as_of = cli.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    log::info!("Analyzing {} records as of {}", records.len(), as_of);
    let engine = ComparisonEngine::new(config.clone(), as_of);

    let result = match cli.command {
        Commands::Compare {
            metric,
            period,
            start,
            end,
        } => {
            let custom_range = start.zip(end);
            ReportBody::Comparison(engine.compare_periods(&records, metric, period, custom_range)?)
        }
        Commands::Trend {
            metric,
            granularity,
            count,
        } => ReportBody::Trend(engine.compare_multiple_periods(&records, metric, granularity, count)?),
        Commands::Benchmark {
            metric,
            value,
            kind,
        } => ReportBody::Benchmark(engine.compare_to_benchmark(&records, metric, value, kind)?),
        Commands::Annual { year } => ReportBody::Annual(engine.generate_annual_report(&records, year)?),
    };

    let report = AnalysisReport {
        metadata: ReportMetadata {
            analysis_timestamp: chrono::Utc::now().to_rfc3339(),
            as_of,
            record_source: cli.records.display().to_string(),
            total_records: records.len(),
            locale: config.general.locale.clone(),
            currency: config.general.currency.clone(),
        },
        result,
    };

    write_reports(&cli.output, &report, &catalog)?;
    print_summary(&report, &catalog);

    Ok(())
}

fn write_reports(output: &Path, report: &AnalysisReport, catalog: &MapCatalog) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let name = report.result.name();
    generate_json_report(report, &output.join(format!("{}.json", name)))?;
    generate_text_report(report, catalog, &output.join(format!("{}.txt", name)))?;
    Ok(())
}
