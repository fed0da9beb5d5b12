use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineKind;

/// Outcome of one pipeline run, written as JSON with `--output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub pipeline: PipelineKind,
    pub project: String,
    pub jql: String,
    pub sheet: String,
    pub completed_at: DateTime<Utc>,
    pub issues_fetched: usize,
    /// Data rows, header excluded
    pub rows_written: usize,
    pub columns: usize,
    pub staging_file: String,
    pub range: String,
    pub publish: PublishStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PublishStatus {
    Published {
        updated_range: String,
        updated_rows: usize,
        updated_columns: usize,
        updated_cells: usize,
    },
    Skipped,
}

impl RunReport {
    /// Issues fetched but not turned into rows by the variant's acceptance rule.
    pub fn issues_skipped(&self) -> usize {
        self.issues_fetched.saturating_sub(self.rows_written)
    }

    pub fn is_published(&self) -> bool {
        matches!(self.publish, PublishStatus::Published { .. })
    }
}
