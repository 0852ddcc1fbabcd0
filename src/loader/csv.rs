// Delimited schedule import

use crate::error::{SynchroError, SynchroResult};
use crate::model::{CellValue, Row, RowTable};
use std::path::Path;

const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "#NA",
    "<NA>",
];

pub fn is_null_token(field: &str) -> bool {
    NULL_TOKENS.contains(&field.trim())
}

/// Read a CSV export with a header row.
///
/// Column types are inferred over the whole column: when every non-null
/// field parses as a number the column holds numbers, otherwise every
/// non-null field is kept as text, including numeric-looking ones.
pub fn read_csv_table(path: &Path) -> SynchroResult<RowTable> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SynchroError::load(path, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| SynchroError::load(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| SynchroError::load(path, e))?;
        let fields: Vec<String> = (0..columns.len())
            .map(|idx| record.get(idx).unwrap_or("").to_string())
            .collect();
        records.push(fields);
    }

    let numeric: Vec<bool> = (0..columns.len())
        .map(|idx| {
            records
                .iter()
                .map(|fields| fields[idx].as_str())
                .filter(|field| !is_null_token(field))
                .all(|field| field.trim().parse::<f64>().is_ok())
        })
        .collect();

    let rows = records
        .into_iter()
        .map(|fields| {
            columns
                .iter()
                .zip(fields)
                .zip(&numeric)
                .map(|((name, field), is_numeric)| {
                    (name.clone(), typed_value(field, *is_numeric))
                })
                .collect::<Row>()
        })
        .collect();

    Ok(RowTable::new(columns, rows))
}

fn typed_value(field: String, numeric_column: bool) -> CellValue {
    if is_null_token(&field) {
        return CellValue::Empty;
    }
    if numeric_column {
        if let Ok(number) = field.trim().parse::<f64>() {
            return CellValue::Number(number);
        }
    }
    CellValue::Text(field)
}
