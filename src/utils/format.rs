//! Number formatting for text reports.

use crate::analysis::MetricKind;

/// Format a percentage with one decimal, e.g. `12.5%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format an amount rounded to whole units with thousands separators,
/// followed by the currency code, e.g. `8,000,000 SAR`
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{} {}", sign, grouped, currency)
}

/// Format a metric value in the unit that metric is reported in
pub fn format_metric_value(value: f64, metric: MetricKind, currency: &str) -> String {
    match metric {
        MetricKind::WinRate | MetricKind::AverageMargin => format_percentage(value),
        MetricKind::TotalValue | MetricKind::AverageBidValue => format_currency(value, currency),
        MetricKind::PreparationTime => format!("{:.1} h", value),
        MetricKind::BidCount | MetricKind::CompetitorCount => format!("{:.1}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(8_000_000.0, "SAR"), "8,000,000 SAR");
        assert_eq!(format_currency(999.4, "SAR"), "999 SAR");
        assert_eq!(format_currency(-1_234.6, "USD"), "-1,235 USD");
        assert_eq!(format_currency(0.0, "SAR"), "0 SAR");
    }

    #[test]
    fn test_format_metric_value_units() {
        assert_eq!(format_metric_value(50.0, MetricKind::WinRate, "SAR"), "50.0%");
        assert_eq!(format_metric_value(12.26, MetricKind::PreparationTime, "SAR"), "12.3 h");
        assert_eq!(format_metric_value(3.0, MetricKind::BidCount, "SAR"), "3.0");
    }
}
