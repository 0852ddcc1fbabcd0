//! Target workbook service: open the workbook holding the template, list its
//! sheets and save the augmented copy.

use crate::error::{SynchroError, SynchroResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use umya_spreadsheet::Spreadsheet;
use umya_spreadsheet::reader::xlsx;

/// An opened target workbook plus the file facts worth logging.
pub struct TargetWorkbook {
    pub path: PathBuf,
    pub bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub book: Spreadsheet,
}

impl TargetWorkbook {
    pub fn open(path: &Path) -> SynchroResult<Self> {
        let metadata = fs::metadata(path)
            .map_err(|e| SynchroError::workbook(path, format!("unable to read metadata: {e}")))?;
        let book = open_workbook(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes: metadata.len(),
            last_modified: metadata.modified().ok().map(system_time_to_utc),
            book,
        })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        sheet_names(&self.book)
    }
}

pub fn open_workbook(path: &Path) -> SynchroResult<Spreadsheet> {
    xlsx::read(path).map_err(|e| SynchroError::workbook(path, format!("failed to parse workbook: {e}")))
}

/// Write `book` to `path`, creating missing parent directories.
pub fn save_workbook(book: &Spreadsheet, path: &Path) -> SynchroResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SynchroError::workbook(path, e))?;
    }
    umya_spreadsheet::writer::xlsx::write(book, path)
        .map_err(|e| SynchroError::workbook(path, format!("failed to save workbook: {e}")))
}

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|sheet| sheet.get_name().to_string())
        .collect()
}

fn system_time_to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
