//! TOML summary of a finished run.
//!
//! Carries the per-palette change counts, which the images do not show.

use crate::analyzer::{AnalysisOutcome, Termination};
use crate::tracking::FrameDiffer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),
}

/// Change count for one palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketReport {
    pub index: usize,
    /// `#rrggbb`
    pub color: String,
    pub changes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub frames_processed: u64,
    pub changed_positions: usize,
    pub unchanged_positions: usize,
    pub max_changes: u32,
    pub termination: Termination,
    pub palette: Vec<BucketReport>,
}

impl RunReport {
    pub fn new(input: &Path, differ: &FrameDiffer, outcome: &AnalysisOutcome) -> Self {
        let palette = differ.palette();
        let buckets = differ
            .buckets()
            .iter()
            .map(|(index, changes)| BucketReport {
                index: index.get(),
                color: format!("#{:06x}", palette.rgb(index)),
                changes,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            input: input.display().to_string(),
            frames_processed: outcome.frames_processed,
            changed_positions: differ.changed_positions(),
            unchanged_positions: differ.changes().len() - differ.changed_positions(),
            max_changes: outcome.heatmaps.max_changes,
            termination: outcome.termination,
            palette: buckets,
        }
    }

    pub fn to_toml(&self) -> Result<String, ReportError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serializes and writes the report to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        std::fs::write(path.as_ref(), self.to_toml()?)?;
        tracing::info!(path = %path.as_ref().display(), "Wrote run report");
        Ok(())
    }
}
