use super::csv::is_null_token;
use crate::error::{SynchroError, SynchroResult};
use crate::model::{CellValue, Row, RowTable};
use std::path::Path;
use umya_spreadsheet::{Cell, Worksheet, reader::xlsx};

const NUMERIC_DATA_TYPE: &str = "n";

/// Read the first worksheet of a workbook export. Row 1 is the header.
pub fn read_xlsx_table(path: &Path) -> SynchroResult<RowTable> {
    let book = xlsx::read(path).map_err(|e| SynchroError::load(path, e))?;
    let sheet = book
        .get_sheet_collection()
        .first()
        .ok_or_else(|| SynchroError::load(path, "workbook has no worksheets"))?;
    Ok(table_from_sheet(sheet))
}

pub(crate) fn table_from_sheet(sheet: &Worksheet) -> RowTable {
    let (max_col, max_row) = sheet.get_highest_column_and_row();

    let columns: Vec<String> = (1..=max_col)
        .map(|col| {
            sheet
                .get_cell((col, 1))
                .map(|cell| cell.get_value().trim().to_string())
                .unwrap_or_default()
        })
        .collect();

    let rows = (2..=max_row)
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = sheet
                        .get_cell((idx as u32 + 1, row))
                        .map(cell_to_value)
                        .unwrap_or_default();
                    (name.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    RowTable::new(columns, rows)
}

/// Numeric-typed cells become numbers. Text stays text even when it looks
/// numeric, except the null tokens shared with the delimited reader.
fn cell_to_value(cell: &Cell) -> CellValue {
    let raw = cell.get_value();
    if raw.trim().is_empty() {
        return CellValue::Empty;
    }
    if cell.get_data_type() == NUMERIC_DATA_TYPE {
        if let Ok(number) = raw.trim().parse::<f64>() {
            return CellValue::Number(number);
        }
    }
    if is_null_token(&raw) {
        return CellValue::Empty;
    }
    CellValue::Text(raw.to_string())
}
