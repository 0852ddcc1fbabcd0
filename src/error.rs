//! Error taxonomy for a synchronisation run.
//!
//! Fatal errors abort the run before the output workbook is saved. Only
//! [`SynchroError::SheetCreation`] is recoverable: the affected classification
//! group is skipped and the remaining groups are still written.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the pipeline
pub type SynchroResult<T> = Result<T, SynchroError>;

#[derive(Debug, Error)]
pub enum SynchroError {
    /// Missing source/target path or an unusable configuration value
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Source table could not be read or lacks a required column
    #[error("failed to load source table {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// Target workbook could not be opened or the output could not be saved
    #[error("workbook {path:?}: {reason}")]
    Workbook { path: PathBuf, reason: String },

    /// Template clone or sheet naming failed for one classification group
    #[error("could not create sheet '{sheet}': {reason}")]
    SheetCreation { sheet: String, reason: String },

    /// A write landed outside the fixed layout contract
    #[error("failed to write {address} on sheet '{sheet}': {reason}")]
    CellWrite {
        sheet: String,
        address: String,
        reason: String,
    },
}

impl SynchroError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SynchroError::Configuration {
            message: message.into(),
        }
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SynchroError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn workbook(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SynchroError::Workbook {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn sheet_creation(sheet: impl Into<String>, reason: impl ToString) -> Self {
        SynchroError::SheetCreation {
            sheet: sheet.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the run may continue with the next classification group
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SynchroError::SheetCreation { .. })
    }

    /// Short category label used in structured log fields
    pub fn category(&self) -> &'static str {
        match self {
            SynchroError::Configuration { .. } => "configuration_error",
            SynchroError::Load { .. } => "load_error",
            SynchroError::Workbook { .. } => "io_error",
            SynchroError::SheetCreation { .. } => "sheet_creation_error",
            SynchroError::CellWrite { .. } => "cell_write_error",
        }
    }
}
