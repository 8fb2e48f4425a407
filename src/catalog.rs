//! Locale text catalog.
//!
//! The engine only ever emits [`InsightKey`]s. A [`TextCatalog`] maps those
//! keys (plus metric, significance and benchmark type labels) to per-locale
//! templates, and [`render_insight`] fills in the placeholders:
//!
//! - `{metric}`: display name of the insight's metric
//! - `{percent}`: the insight magnitude formatted as a percentage
//! - `{value}`: the insight magnitude as a plain number
//!
//! A key missing from the requested locale falls back to English, and a key
//! missing everywhere renders as the raw key.

use std::collections::HashMap;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::analysis::{BenchmarkInsight, Insight, InsightKey, MetricKind};
use crate::utils::format::format_percentage;

pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN_CATALOG: &str = include_str!("../locales/catalog.yaml");

/// Source of display templates
pub trait TextCatalog: Send + Sync {
    /// Template for `key` in `locale`, if the catalog has one
    fn template(&self, locale: &str, key: &str) -> Option<&str>;

    /// Template for `key`, falling back to the default locale and then to the key itself
    fn text(&self, locale: &str, key: &str) -> String {
        self.template(locale, key)
            .or_else(|| self.template(DEFAULT_LOCALE, key))
            .unwrap_or(key)
            .to_string()
    }
}

/// Catalog backed by `{locale: {key: template}}` maps
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MapCatalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl MapCatalog {
    /// Catalog with the embedded English and Arabic text
    pub fn builtin() -> Self {
        Self::from_yaml_str(BUILTIN_CATALOG).unwrap_or_else(|e| {
            log::error!("Embedded text catalog is malformed: {}", e);
            Self::default()
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a catalog file with the same layout as the embedded one
    pub fn from_path(path: &Path) -> color_eyre::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read text catalog '{}'", path.display()))?;
        Self::from_yaml_str(&yaml)
            .wrap_err_with(|| format!("Failed to parse text catalog '{}'", path.display()))
    }

    /// Layer `other` on top of this catalog, replacing templates it redefines
    pub fn merge(&mut self, other: MapCatalog) {
        for (locale, entries) in other.locales {
            self.locales.entry(locale).or_default().extend(entries);
        }
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }
}

impl TextCatalog for MapCatalog {
    fn template(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }
}

/// Insight with every key resolved to text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedInsight {
    pub summary: String,
    pub interpretation: String,
    pub significance: String,
    pub recommendations: Vec<String>,
}

/// Benchmark insight with every key resolved to text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBenchmarkInsight {
    pub summary: String,
    pub analysis: String,
    pub actions: Vec<String>,
}

/// Display name of `metric` in `locale`
pub fn metric_label(catalog: &dyn TextCatalog, locale: &str, metric: MetricKind) -> String {
    catalog.text(locale, metric.label_key())
}

/// Resolve `key` and substitute the placeholders
pub fn render_key(
    catalog: &dyn TextCatalog,
    locale: &str,
    key: InsightKey,
    metric: Option<MetricKind>,
    magnitude: f64,
) -> String {
    let mut text = catalog.text(locale, key.as_str());
    if text.contains("{metric}") {
        let label = metric
            .map(|m| metric_label(catalog, locale, m))
            .unwrap_or_default();
        text = text.replace("{metric}", &label);
    }
    text.replace("{percent}", &format_percentage(magnitude))
        .replace("{value}", &magnitude.to_string())
}

pub fn render_insight(insight: &Insight, catalog: &dyn TextCatalog, locale: &str) -> RenderedInsight {
    let render = |key| render_key(catalog, locale, key, insight.metric, insight.magnitude);
    RenderedInsight {
        summary: render(insight.summary_key),
        interpretation: render(insight.interpretation_key),
        significance: catalog.text(locale, insight.significance_level.label_key()),
        recommendations: insight.recommendation_keys.iter().map(|k| render(*k)).collect(),
    }
}

pub fn render_benchmark_insight(
    insight: &BenchmarkInsight,
    catalog: &dyn TextCatalog,
    locale: &str,
) -> RenderedBenchmarkInsight {
    let render = |key| render_key(catalog, locale, key, Some(insight.metric), insight.magnitude);
    RenderedBenchmarkInsight {
        summary: render(insight.summary_key),
        analysis: render(insight.analysis_key),
        actions: insight.action_keys.iter().map(|k| render(*k)).collect(),
    }
}
