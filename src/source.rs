//! Record retrieval.
//!
//! Fetching bid records is the engine's only asynchronous step. Everything
//! downstream of [`RecordSource::fetch`] is synchronous.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::analysis::BidRecord;

/// Errors raised while fetching records
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read records from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML records: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported record file format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// Asynchronous provider of bid records
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<BidRecord>, SourceError>;
}

/// Record file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
}

impl RecordFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(RecordFormat::Json),
            "yaml" | "yml" => Ok(RecordFormat::Yaml),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Record files hold either a bare list or a `records` list under a wrapper object
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    List(Vec<BidRecord>),
    Wrapped { records: Vec<BidRecord> },
}

impl From<RecordDocument> for Vec<BidRecord> {
    fn from(document: RecordDocument) -> Self {
        match document {
            RecordDocument::List(records) | RecordDocument::Wrapped { records } => records,
        }
    }
}

/// Parse records from an in-memory document
pub fn parse_records(content: &str, format: RecordFormat) -> Result<Vec<BidRecord>, SourceError> {
    let document: RecordDocument = match format {
        RecordFormat::Json => serde_json::from_str(content)?,
        RecordFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(document.into())
}

/// Reads records from a JSON or YAML file
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn fetch(&self) -> Result<Vec<BidRecord>, SourceError> {
        let format = RecordFormat::from_path(&self.path)?;
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        let records = parse_records(&content, format)?;
        log::info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Serves a fixed set of records
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<BidRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<BidRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch(&self) -> Result<Vec<BidRecord>, SourceError> {
        Ok(self.records.clone())
    }
}
