//! Run report with partial success at sheet granularity.

use crate::error::SynchroError;
use crate::utils::path_to_forward_slashes;
use crate::writer::SheetOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// A classification group whose sheet could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSheet {
    /// Position of the group in output order
    pub index: usize,
    pub sheet: String,
    pub category: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub groups_built: usize,
    pub sheets_written: usize,
    pub sheets_skipped: usize,
    pub sheets_replaced: usize,
    pub rows_inserted: u32,
    /// Share of groups that produced a sheet, 0-100
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub output_path: String,
    /// Modification time of the target workbook when it was opened
    pub target_modified: Option<DateTime<Utc>>,
    pub written: Vec<SheetOutcome>,
    pub skipped: Vec<SkippedSheet>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(output_path: &Path, groups_built: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            output_path: path_to_forward_slashes(output_path),
            target_modified: None,
            written: Vec::with_capacity(groups_built),
            skipped: Vec::new(),
            summary: RunSummary {
                groups_built,
                sheets_written: 0,
                sheets_skipped: 0,
                sheets_replaced: 0,
                rows_inserted: 0,
                success_rate: 0.0,
            },
        }
    }

    pub fn add_written(&mut self, outcome: SheetOutcome) {
        self.summary.sheets_written += 1;
        if outcome.replaced_existing {
            self.summary.sheets_replaced += 1;
        }
        self.summary.rows_inserted += outcome.rows_inserted;
        self.written.push(outcome);
    }

    pub fn add_skipped(&mut self, index: usize, sheet: &str, error: &SynchroError) {
        self.summary.sheets_skipped += 1;
        self.skipped.push(SkippedSheet {
            index,
            sheet: sheet.to_string(),
            category: error.category().to_string(),
            reason: error.to_string(),
        });
    }

    pub fn finalize(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        if self.summary.groups_built > 0 {
            self.summary.success_rate =
                (self.summary.sheets_written as f64 / self.summary.groups_built as f64) * 100.0;
        }
        self
    }

    pub fn is_complete_success(&self) -> bool {
        self.skipped.is_empty() && self.summary.sheets_written == self.summary.groups_built
    }
}
