//! Append-only log of received static reports.
//!
//! Each record is written as two lines: an RFC 3339 timestamp followed by
//! the report as JSON. The file is never rotated.

use std::path::{Path, PathBuf};

use aistrack_core::StaticReport;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Errors that can occur while appending to the log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to write static log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize static report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Best-effort static report log.
#[derive(Debug, Clone)]
pub struct StaticLog {
    path: PathBuf,
}

impl StaticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one report.
    pub async fn append(&self, report: &StaticReport, at: DateTime<Utc>) -> Result<(), LogError> {
        let record = format!(
            "{}\n{}\n",
            at.to_rfc3339_opts(SecondsFormat::Micros, true),
            serde_json::to_string(report)?
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
