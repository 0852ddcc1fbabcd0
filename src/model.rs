use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A single source cell, tagged by what the loader found in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The numeric payload, if this cell holds a usable number. NaN is not one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// Text used for grouping keys, names and header cells.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One record of the source schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn new(cells: IndexMap<String, CellValue>) -> Self {
        Self { cells }
    }

    pub fn get(&self, field: &str) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(field).unwrap_or(EMPTY)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The loaded source table, rows in source order.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowTable {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Unit {
    #[strum(serialize = "m2")]
    #[serde(rename = "m2")]
    SquareMetres,
    #[strum(serialize = "mm")]
    #[serde(rename = "mm")]
    Millimetres,
    #[strum(serialize = "EA")]
    #[serde(rename = "EA")]
    Each,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn count(rows: usize) -> Self {
        Self {
            amount: rows as f64,
            unit: Unit::Each,
        }
    }
}

/// All rows of one element type within a classification group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeGroup {
    pub name: String,
    pub quantity: Quantity,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationGroup {
    pub code: String,
    pub description: String,
    pub elements: Vec<TypeGroup>,
}
