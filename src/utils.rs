use anyhow::{Result, anyhow, bail};
use std::path::Path;
use umya_spreadsheet::helper::coordinate::index_from_coordinate;

/// Highest row index an xlsx worksheet can address.
pub const MAX_SHEET_ROWS: u32 = 1_048_576;
const MAX_SHEET_COLUMNS: u32 = 16_384;

/// Parse `B6` or `$B$6` into `(column, row)`, both 1-based.
pub fn parse_cell_ref(cell: &str) -> Result<(u32, u32)> {
    let cell = cell.trim();
    if !is_a1_shaped(cell) {
        bail!("Invalid cell reference: {}", cell);
    }
    let (col, row, _, _) = index_from_coordinate(cell);
    match (col, row) {
        (Some(c), Some(r)) if c <= MAX_SHEET_COLUMNS && (1..=MAX_SHEET_ROWS).contains(&r) => {
            Ok((c, r))
        }
        _ => Err(anyhow!("Invalid cell reference: {}", cell)),
    }
}

// letters then digits, each optionally pinned with `$`
fn is_a1_shaped(cell: &str) -> bool {
    let rest = cell.strip_prefix('$').unwrap_or(cell);
    let letters = rest.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let digits = rest[letters..].strip_prefix('$').unwrap_or(&rest[letters..]);
    letters > 0 && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Inclusive rectangle covered by a range such as `A15:C15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBounds {
    pub min_col: u32,
    pub max_col: u32,
    pub min_row: u32,
    pub max_row: u32,
}

impl RangeBounds {
    pub fn contains(&self, col: u32, row: u32) -> bool {
        (self.min_col..=self.max_col).contains(&col) && (self.min_row..=self.max_row).contains(&row)
    }

    pub fn touches_row(&self, row: u32) -> bool {
        (self.min_row..=self.max_row).contains(&row)
    }
}

pub fn parse_range_bounds(range: &str) -> Result<RangeBounds> {
    let parts: Vec<&str> = range.split(':').collect();
    let (start, end) = match parts.as_slice() {
        [single] => {
            let cell = parse_cell_ref(single)?;
            (cell, cell)
        }
        [first, last] => (parse_cell_ref(first)?, parse_cell_ref(last)?),
        _ => bail!("Invalid range format. Expected 'A1:Z99'"),
    };

    Ok(RangeBounds {
        min_col: start.0.min(end.0),
        max_col: start.0.max(end.0),
        min_row: start.1.min(end.1),
        max_row: start.1.max(end.1),
    })
}

pub fn path_to_forward_slashes(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if raw.contains('\\') {
        raw.replace('\\', "/")
    } else {
        raw.into_owned()
    }
}
