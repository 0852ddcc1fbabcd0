use crate::config::FieldNames;
use crate::model::{CellValue, Quantity, Row, Unit};

/// Pick the representative quantity for one element type.
///
/// Summed area wins when every row carries a numeric area, then summed
/// length under the same rule, otherwise the row count. A zero result from
/// any branch falls back to the row count. Negative inputs are summed as
/// they are, so a negative total passes through with its unit.
pub fn resolve_quantity(rows: &[&Row], fields: &FieldNames) -> Quantity {
    let resolved = if let Some(area) = sum_if_all_numeric(rows.iter().map(|r| r.get(&fields.area))) {
        Quantity {
            amount: area,
            unit: Unit::SquareMetres,
        }
    } else if let Some(length) =
        sum_if_all_numeric(rows.iter().map(|r| r.get(&fields.length)))
    {
        Quantity {
            amount: length,
            unit: Unit::Millimetres,
        }
    } else {
        Quantity::count(rows.len())
    };

    if resolved.amount == 0.0 {
        Quantity::count(rows.len())
    } else {
        resolved
    }
}

fn sum_if_all_numeric<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values
        .into_iter()
        .try_fold(0.0, |total, value| value.as_number().map(|n| total + n))
}
