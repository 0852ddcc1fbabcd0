//! Source table loading.
//!
//! The export format is picked from the file extension: `.csv` goes through
//! the delimited reader, anything else is opened as a workbook. Both paths
//! drop the first data row after the header before the table is handed on.

mod csv;
mod xlsx;

use crate::config::FieldNames;
use crate::error::{SynchroError, SynchroResult};
use crate::events::{PipelineEvent, PipelineEvents};
use crate::model::{Row, RowTable};
use std::path::Path;

/// Data rows discarded directly below the header.
pub const LEADING_ROWS_DROPPED: usize = 1;

pub use self::csv::{is_null_token, read_csv_table};
pub use self::xlsx::read_xlsx_table;

pub fn load_row_table(
    path: &Path,
    fields: &FieldNames,
    events: &dyn PipelineEvents,
) -> SynchroResult<RowTable> {
    let table = if is_delimited(path) {
        read_csv_table(path)?
    } else {
        read_xlsx_table(path)?
    };

    if let Some(missing) = fields.all().into_iter().find(|f| !table.has_column(f)) {
        return Err(SynchroError::load(
            path,
            format!("required column '{missing}' not found in header"),
        ));
    }

    let table = drop_leading_rows(table);
    events.emit(PipelineEvent::TableLoaded {
        rows: table.len(),
        dropped_leading: LEADING_ROWS_DROPPED,
    });
    Ok(table)
}

fn is_delimited(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn drop_leading_rows(table: RowTable) -> RowTable {
    let RowTable { columns, rows } = table;
    let rows: Vec<Row> = rows.into_iter().skip(LEADING_ROWS_DROPPED).collect();
    RowTable::new(columns, rows)
}
