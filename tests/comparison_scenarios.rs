#[cfg(test)]
mod comparison_scenarios {
    use std::io::Write;

    use chrono::{Datelike, Duration, NaiveDate};
    use tempfile::Builder;

    use tender_trends::analysis::benchmark::evaluate_value;
    use tender_trends::analysis::metrics::extract;
    use tender_trends::analysis::periods::PeriodResolver;
    use tender_trends::analysis::{
        BenchmarkStatus, BenchmarkType, BidOutcome, BidRecord, ChangeDirection, Granularity,
        MetricKind, PerformanceRating, PeriodBoundary, PeriodType, TrendDirection,
    };
    use tender_trends::catalog::{render_insight, MapCatalog};
    use tender_trends::config::{AnalysisConfig, BenchmarkSettings};
    use tender_trends::config_loader::load_config;
    use tender_trends::orchestrator::ComparisonEngine;
    use tender_trends::source::FileRecordSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_records() -> Vec<BidRecord> {
        vec![
            BidRecord::new("T-1", date(2024, 1, 15), BidOutcome::Won, 5_000_000.0, 18.0),
            BidRecord::new("T-2", date(2024, 2, 15), BidOutcome::Lost, 3_000_000.0, 15.0),
        ]
    }

    /// A bid every few days through 2023 and 2024, with a rising win share
    fn two_year_history() -> Vec<BidRecord> {
        let mut records = Vec::new();
        let mut day = date(2023, 1, 2);
        let mut i = 0u32;
        while day <= date(2024, 12, 28) {
            let outcome = match i % 5 {
                0 | 1 => BidOutcome::Won,
                2 if day.year() == 2024 => BidOutcome::Won,
                4 => BidOutcome::Pending,
                _ => BidOutcome::Lost,
            };
            records.push(
                BidRecord::new(format!("H-{}", i), day, outcome, 250_000.0 + f64::from(i % 7) * 10_000.0, 12.0)
                    .with_competitor_count(3 + i % 4)
                    .with_preparation_time(20.0 + f64::from(i % 3) * 5.0),
            );
            day += Duration::days(3);
            i += 1;
        }
        records
    }

    #[test]
    fn test_combined_scenario_metrics() {
        let records = scenario_records();
        assert_eq!(extract(&records, MetricKind::WinRate), 50.0);
        assert_eq!(extract(&records, MetricKind::AverageMargin), 16.5);
        assert_eq!(extract(&records, MetricKind::TotalValue), 8_000_000.0);
    }

    #[test]
    fn test_empty_records_extract_zero() {
        let records: Vec<BidRecord> = Vec::new();
        for metric in MetricKind::ALL {
            assert_eq!(extract(&records, metric), 0.0);
        }
    }

    #[test]
    fn test_resolved_periods_are_adjacent() {
        let mut anchor = date(2023, 1, 1);
        while anchor <= date(2025, 1, 1) {
            let resolver = PeriodResolver::new(anchor);
            for period_type in [
                PeriodType::MonthOverMonth,
                PeriodType::QuarterOverQuarter,
                PeriodType::YearOverYear,
            ] {
                let (current, previous) = resolver
                    .resolve_current_and_previous(period_type, None)
                    .unwrap();
                assert_eq!(previous.end() + Duration::days(1), current.start());
                assert!(current.contains(anchor), "{} not in {}", anchor, current);
            }

            let custom = PeriodBoundary::new(anchor, anchor + Duration::days(16)).unwrap();
            let (current, previous) = resolver
                .resolve_current_and_previous(PeriodType::Custom, Some(custom))
                .unwrap();
            assert_eq!(previous.end() + Duration::days(1), current.start());
            assert_eq!(previous.days(), current.days());

            anchor += Duration::days(11);
        }
    }

    #[test]
    fn test_single_period_trend_matches_comparison() {
        let records = two_year_history();
        let engine = ComparisonEngine::new(AnalysisConfig::default(), date(2024, 8, 14));

        let pairs = [
            (Granularity::Monthly, PeriodType::MonthOverMonth),
            (Granularity::Quarterly, PeriodType::QuarterOverQuarter),
            (Granularity::Yearly, PeriodType::YearOverYear),
        ];
        for (granularity, period_type) in pairs {
            for metric in MetricKind::ALL {
                let trend = engine
                    .compare_multiple_periods(&records, metric, granularity, Some(1))
                    .unwrap();
                let comparison = engine
                    .compare_periods(&records, metric, period_type, None)
                    .unwrap();
                assert_eq!(trend.series.len(), 1);
                assert_eq!(
                    trend.series[0].value, comparison.comparison.current.value,
                    "{} {}",
                    granularity, metric
                );
            }
        }
    }

    #[test]
    fn test_benchmark_scenario() {
        let result = evaluate_value(
            65.0,
            MetricKind::WinRate,
            50.0,
            BenchmarkType::Industry,
            &BenchmarkSettings::default(),
        )
        .unwrap();
        assert!((result.percentage_difference - 30.0).abs() < 1e-9);
        assert_eq!(result.status, BenchmarkStatus::Above);
        assert_eq!(result.rating, PerformanceRating::Excellent);
    }

    #[test]
    fn test_year_over_year_on_history() {
        let records = two_year_history();
        let engine = ComparisonEngine::new(AnalysisConfig::default(), date(2024, 12, 31));
        let result = engine
            .compare_year_over_year(&records, MetricKind::WinRate)
            .unwrap();

        assert_eq!(result.comparison.current.label, "2024");
        assert_eq!(result.comparison.previous.label, "2023");
        assert_eq!(result.comparison.direction, ChangeDirection::Increase);
        assert_eq!(result.comparison.significance, 0.95);

        let catalog = MapCatalog::builtin();
        let rendered = render_insight(&result.insight, &catalog, "en");
        assert!(rendered.summary.starts_with("Win rate increased by"));
        assert_eq!(rendered.significance, "high");
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let records = two_year_history();
        let engine = ComparisonEngine::new(AnalysisConfig::default(), date(2024, 10, 3));

        let first = engine.generate_annual_report(&records, None).unwrap();
        let second = engine.generate_annual_report(&records, None).unwrap();
        assert_eq!(first, second);

        let trend_a = engine
            .compare_multiple_periods(&records, MetricKind::AverageMargin, Granularity::Monthly, None)
            .unwrap();
        let trend_b = engine
            .compare_multiple_periods(&records, MetricKind::AverageMargin, Granularity::Monthly, None)
            .unwrap();
        assert_eq!(trend_a, trend_b);
        // Every record has a 12% margin
        assert_eq!(trend_a.characterization.direction, TrendDirection::Stable);
        assert_eq!(trend_a.characterization.volatility, 0.0);
        assert_eq!(trend_a.characterization.consistency, 1.0);
    }

    #[tokio::test]
    async fn test_file_source_with_yaml_config() {
        let mut records_file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            records_file,
            "{}",
            serde_json::to_string(&serde_json::json!({ "records": scenario_records() })).unwrap()
        )
        .unwrap();

        let mut config_file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(config_file, "general:\n  locale: ar\ncomparison:\n  min_sample_size: 1\n").unwrap();
        let config = load_config(config_file.path()).unwrap();

        let engine = ComparisonEngine::new(config, date(2024, 2, 20));
        let source = FileRecordSource::new(records_file.path());
        let result = engine
            .compare_periods_from_source(&source, MetricKind::TotalValue, PeriodType::MonthOverMonth, None)
            .await
            .unwrap();

        assert_eq!(result.comparison.current.value, 3_000_000.0);
        assert_eq!(result.comparison.previous.value, 5_000_000.0);
        assert_eq!(result.comparison.direction, ChangeDirection::Decrease);
        assert_eq!(result.comparison.significance, 0.5 + 1.0 / 100.0);

        let rendered = render_insight(&result.insight, &MapCatalog::builtin(), &engine.config().general.locale);
        assert_eq!(rendered.summary, "إجمالي القيمة انخفض بنسبة 40.0%");
    }
}
