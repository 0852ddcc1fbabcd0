//! Classification and type partitioning of the schedule.
//!
//! Both levels are ordered by the display text of their key, ascending, so
//! repeated runs over the same table produce the same sheet and row order.
//! Keys that read as numbers sort numerically ahead of the rest, so `9`
//! comes before `10`.
//! Inside a partition rows keep their source order, which is what "first
//! row" refers to for descriptions and names.

use super::quantity::resolve_quantity;
use crate::config::FieldNames;
use crate::events::{PipelineEvent, PipelineEvents};
use crate::model::{ClassificationGroup, Row, RowTable, TypeGroup};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const NAME_SEPARATOR: &str = " : ";

/// Display text of a grouping key, ordered numerically when it parses as a
/// finite number. Equality stays on the text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupKey(String);

impl GroupKey {
    fn numeric(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_number = match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_number.then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classification key of a row, or `None` when the code is missing or blank.
pub fn classification_key(row: &Row, fields: &FieldNames) -> Option<String> {
    let key = row.get(&fields.classification_number).display_text();
    if key.trim().is_empty() {
        None
    } else {
        Some(key)
    }
}

pub fn type_key(row: &Row, fields: &FieldNames) -> String {
    row.get(&fields.type_name).display_text()
}

pub fn build_classification_groups(
    table: &RowTable,
    fields: &FieldNames,
    events: &dyn PipelineEvents,
) -> Vec<ClassificationGroup> {
    let mut partitions: BTreeMap<GroupKey, Vec<&Row>> = BTreeMap::new();
    let mut skipped = 0usize;
    for row in &table.rows {
        match classification_key(row, fields) {
            Some(key) => partitions.entry(GroupKey(key)).or_default().push(row),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        events.emit(PipelineEvent::ClassificationSkipped { rows: skipped });
    }

    partitions
        .into_values()
        .map(|rows| build_classification_group(&rows, fields, events))
        .collect()
}

fn build_classification_group(
    rows: &[&Row],
    fields: &FieldNames,
    events: &dyn PipelineEvents,
) -> ClassificationGroup {
    let first = rows[0];
    let code = first.get(&fields.classification_number).display_text();
    let description = first
        .get(&fields.classification_description)
        .display_text();
    let elements = build_type_groups(&code, rows, fields, events);

    events.emit(PipelineEvent::ClassificationBuilt {
        code: code.clone(),
        description: description.clone(),
        type_count: elements.len(),
    });

    ClassificationGroup {
        code,
        description,
        elements,
    }
}

/// One [`TypeGroup`] per distinct type-name in `rows`. Rows with an empty
/// type-name form their own group.
pub fn build_type_groups(
    code: &str,
    rows: &[&Row],
    fields: &FieldNames,
    events: &dyn PipelineEvents,
) -> Vec<TypeGroup> {
    let mut partitions: BTreeMap<GroupKey, Vec<&Row>> = BTreeMap::new();
    for &row in rows {
        partitions
            .entry(GroupKey(type_key(row, fields)))
            .or_default()
            .push(row);
    }

    partitions
        .into_iter()
        .map(|(GroupKey(type_name), members)| {
            let instance = members[0].get(&fields.instance_name).display_text();
            let name = format!("{instance}{NAME_SEPARATOR}{type_name}");
            let quantity = resolve_quantity(&members, fields);

            events.emit(PipelineEvent::QuantityResolved {
                code: code.to_string(),
                name: name.clone(),
                amount: quantity.amount,
                unit: quantity.unit,
            });

            TypeGroup {
                name,
                quantity,
                row_count: members.len(),
            }
        })
        .collect()
}

/// Source row indices per `(classification, type)` partition, in output order.
pub fn partition_rows(
    table: &RowTable,
    fields: &FieldNames,
) -> IndexMap<(String, String), Vec<usize>> {
    let mut partitions: BTreeMap<(GroupKey, GroupKey), Vec<usize>> = BTreeMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        if let Some(code) = classification_key(row, fields) {
            partitions
                .entry((GroupKey(code), GroupKey(type_key(row, fields))))
                .or_default()
                .push(idx);
        }
    }
    partitions
        .into_iter()
        .map(|((code, type_name), indices)| ((code.0, type_name.0), indices))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEvents;
    use crate::model::{CellValue, Quantity, Unit};

    fn fields() -> FieldNames {
        FieldNames {
            classification_number: "code".into(),
            classification_description: "desc".into(),
            instance_name: "inst".into(),
            type_name: "type".into(),
            area: "area".into(),
            length: "length".into(),
        }
    }

    fn text(s: &str) -> CellValue {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    fn row(code: &str, desc: &str, type_name: &str, inst: &str, area: CellValue) -> Row {
        [
            ("code", text(code)),
            ("desc", text(desc)),
            ("type", text(type_name)),
            ("inst", text(inst)),
            ("area", area),
            ("length", CellValue::Empty),
        ]
        .into_iter()
        .collect()
    }

    fn table(rows: Vec<Row>) -> RowTable {
        let columns = fields().all().iter().map(|s| s.to_string()).collect();
        RowTable::new(columns, rows)
    }

    #[test]
    fn walls_scenario_sums_area() {
        let table = table(vec![
            row("A1", "Walls", "T1", "Wall-01", CellValue::Number(5.0)),
            row("A1", "Walls", "T1", "Wall-01", CellValue::Number(3.0)),
        ]);
        let groups = build_classification_groups(&table, &fields(), &RecordingEvents::new());

        assert_eq!(
            groups,
            vec![ClassificationGroup {
                code: "A1".into(),
                description: "Walls".into(),
                elements: vec![TypeGroup {
                    name: "Wall-01 : T1".into(),
                    quantity: Quantity {
                        amount: 8.0,
                        unit: Unit::SquareMetres
                    },
                    row_count: 2,
                }],
            }]
        );
    }

    #[test]
    fn zero_areas_count_elements() {
        let table = table(vec![
            row("A1", "Walls", "T1", "Wall-01", CellValue::Number(0.0)),
            row("A1", "Walls", "T1", "Wall-02", CellValue::Number(0.0)),
        ]);
        let groups = build_classification_groups(&table, &fields(), &RecordingEvents::new());
        assert_eq!(groups[0].elements[0].quantity, Quantity::count(2));
    }

    #[test]
    fn blank_codes_are_left_out() {
        let table = table(vec![
            row("", "Orphan", "T1", "X", CellValue::Number(1.0)),
            row(" ", "Orphan", "T1", "X", CellValue::Number(1.0)),
            row("B2", "Doors", "D1", "Door-01", CellValue::Empty),
        ]);
        let events = RecordingEvents::new();
        let groups = build_classification_groups(&table, &fields(), &events);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].code, "B2");
        assert_eq!(groups[0].elements[0].row_count, 1);
        assert!(
            events
                .events()
                .contains(&PipelineEvent::ClassificationSkipped { rows: 2 })
        );
    }

    #[test]
    fn groups_are_sorted_and_description_comes_from_first_row() {
        let table = table(vec![
            row("Ss_30", "Doors", "D2", "Door-02", CellValue::Empty),
            row("Ss_25", "Walls", "T2", "Wall-02", CellValue::Number(1.0)),
            row("Ss_30", "Doorsets", "D1", "Door-01", CellValue::Empty),
            row("Ss_25", "Walls", "T1", "Wall-01", CellValue::Number(2.0)),
        ]);
        let groups = build_classification_groups(&table, &fields(), &RecordingEvents::new());

        let codes: Vec<_> = groups.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(codes, vec!["Ss_25", "Ss_30"]);
        assert_eq!(groups[1].description, "Doors");

        let names: Vec<_> = groups[1].elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Door-01 : D1", "Door-02 : D2"]);
    }

    #[test]
    fn name_uses_the_first_instance_of_the_type() {
        let table = table(vec![
            row("A1", "Walls", "T1", "Wall-07", CellValue::Empty),
            row("A1", "Walls", "T1", "Wall-01", CellValue::Empty),
        ]);
        let groups = build_classification_groups(&table, &fields(), &RecordingEvents::new());
        assert_eq!(groups[0].elements[0].name, "Wall-07 : T1");
        assert_eq!(groups[0].elements[0].quantity, Quantity::count(2));
    }

    #[test]
    fn empty_type_names_still_form_a_group() {
        let table = table(vec![
            row("A1", "Walls", "", "Wall-01", CellValue::Number(4.0)),
            row("A1", "Walls", "T1", "Wall-02", CellValue::Number(1.0)),
        ]);
        let groups = build_classification_groups(&table, &fields(), &RecordingEvents::new());
        let names: Vec<_> = groups[0].elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Wall-01 : ", "Wall-02 : T1"]);
    }

    #[test]
    fn numeric_codes_group_by_rendered_text() {
        let numeric: Row = [
            ("code", CellValue::Number(25.0)),
            ("type", text("T1")),
            ("inst", text("Wall-01")),
        ]
        .into_iter()
        .collect();
        let textual: Row = [
            ("code", text("25")),
            ("type", text("T1")),
            ("inst", text("Wall-02")),
        ]
        .into_iter()
        .collect();

        let groups = build_classification_groups(
            &table(vec![numeric, textual]),
            &fields(),
            &RecordingEvents::new(),
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].code, "25");
        assert_eq!(groups[0].elements[0].row_count, 2);
    }

    #[test]
    fn numeric_codes_sort_by_value_before_text() {
        let table = table(vec![
            row("10", "Tens", "T10", "W", CellValue::Empty),
            row("Ss_25", "Walls", "T2", "W", CellValue::Empty),
            row("9", "Nines", "T10", "W", CellValue::Empty),
            row("9", "Nines", "T9", "W", CellValue::Empty),
            row("100", "Hundreds", "T1", "W", CellValue::Empty),
        ]);
        let groups = build_classification_groups(&table, &fields(), &RecordingEvents::new());

        let codes: Vec<_> = groups.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(codes, vec!["9", "10", "100", "Ss_25"]);
        let names: Vec<_> = groups[0].elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["W : T10", "W : T9"]);

        let order: Vec<_> = partition_rows(&table, &fields())
            .keys()
            .map(|(code, _)| code.clone())
            .collect();
        assert_eq!(order, vec!["9", "9", "10", "100", "Ss_25"]);
    }

    #[test]
    fn partition_rows_tracks_source_indices() {
        let table = table(vec![
            row("A1", "Walls", "T1", "W", CellValue::Empty),
            row("", "Walls", "T1", "W", CellValue::Empty),
            row("A1", "Walls", "T2", "W", CellValue::Empty),
            row("A1", "Walls", "T1", "W", CellValue::Empty),
        ]);
        let partitions = partition_rows(&table, &fields());
        assert_eq!(partitions[&("A1".to_string(), "T1".to_string())], vec![0, 3]);
        assert_eq!(partitions[&("A1".to_string(), "T2".to_string())], vec![2]);
        assert_eq!(partitions.len(), 2);
    }
}
