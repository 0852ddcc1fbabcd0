//! Materialises classification groups as sheets cloned from the template.
//!
//! Each group goes through the same fixed sequence: clone the template under
//! the group's code (replacing any sheet of that name), write the header
//! cells, grow the data block when the group has more types than the
//! template reserves, then write one `(name, quantity, unit)` row per type.

use crate::config::{ResolvedLayout, RowStyle, SynchroConfig};
use crate::error::{SynchroError, SynchroResult};
use crate::events::{PipelineEvent, PipelineEvents};
use crate::model::ClassificationGroup;
use crate::styles::{apply_row_style, unmerge_row};
use crate::utils::MAX_SHEET_ROWS;
use serde::Serialize;
use umya_spreadsheet::helper::coordinate::{coordinate_from_index, string_from_column_index};
use umya_spreadsheet::{Spreadsheet, Worksheet};

const MAX_SHEET_NAME_LEN: usize = 31;
const INVALID_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// What writing one group did to the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOutcome {
    pub sheet: String,
    pub replaced_existing: bool,
    pub rows_inserted: u32,
    pub rows_written: usize,
}

pub struct SheetWriter<'a> {
    template_sheet: &'a str,
    layout: ResolvedLayout,
    row_style: &'a RowStyle,
    events: &'a dyn PipelineEvents,
}

impl<'a> SheetWriter<'a> {
    pub fn new(config: &'a SynchroConfig, events: &'a dyn PipelineEvents) -> SynchroResult<Self> {
        Ok(Self {
            template_sheet: &config.template_sheet,
            layout: config.layout.resolve()?,
            row_style: &config.row_style,
            events,
        })
    }

    /// Write one group into `book`.
    ///
    /// [`SynchroError::SheetCreation`] means nothing was changed for this
    /// group and the caller may carry on. [`SynchroError::CellWrite`] means
    /// the layout cannot hold the group.
    pub fn write_group(
        &self,
        book: &mut Spreadsheet,
        group: &ClassificationGroup,
    ) -> SynchroResult<SheetOutcome> {
        let sheet_name = group.code.as_str();
        validate_sheet_name(sheet_name)
            .map_err(|reason| SynchroError::sheet_creation(sheet_name, reason))?;
        if sheet_name.eq_ignore_ascii_case(self.template_sheet) {
            return Err(SynchroError::sheet_creation(
                sheet_name,
                "classification code collides with the template sheet",
            ));
        }
        self.check_row_limit(sheet_name, group.elements.len())?;

        let (sheet, replaced_existing) = self.clone_template(book, sheet_name)?;
        self.write_header(sheet, group);
        let rows_inserted = self.expand_capacity(sheet, group.elements.len());
        let rows_written = self.write_rows(sheet, group);

        self.events.emit(PipelineEvent::SheetCompleted {
            sheet: sheet_name.to_string(),
            rows_written,
        });

        Ok(SheetOutcome {
            sheet: sheet_name.to_string(),
            replaced_existing,
            rows_inserted,
            rows_written,
        })
    }

    fn check_row_limit(&self, sheet: &str, type_count: usize) -> SynchroResult<()> {
        let Some(last_offset) = type_count.checked_sub(1) else {
            return Ok(());
        };
        for (col, row) in [self.layout.name, self.layout.quantity, self.layout.unit] {
            let last_row = u64::from(row) + last_offset as u64;
            if last_row > u64::from(MAX_SHEET_ROWS) {
                return Err(SynchroError::CellWrite {
                    sheet: sheet.to_string(),
                    address: format!("{}{last_row}", string_from_column_index(&col)),
                    reason: format!("row {last_row} exceeds the sheet limit of {MAX_SHEET_ROWS}"),
                });
            }
        }
        Ok(())
    }

    fn clone_template<'b>(
        &self,
        book: &'b mut Spreadsheet,
        sheet_name: &str,
    ) -> SynchroResult<(&'b mut Worksheet, bool)> {
        let mut sheet = book
            .get_sheet_by_name(self.template_sheet)
            .ok_or_else(|| {
                SynchroError::sheet_creation(
                    sheet_name,
                    format!("template sheet '{}' not found", self.template_sheet),
                )
            })?
            .clone();
        sheet.set_name(sheet_name);

        let replaced_existing = book.get_sheet_by_name(sheet_name).is_some();
        if replaced_existing {
            book.remove_sheet_by_name(sheet_name)
                .map_err(|reason| SynchroError::sheet_creation(sheet_name, reason))?;
            self.events.emit(PipelineEvent::SheetReplaced {
                sheet: sheet_name.to_string(),
            });
        }

        let sheet = book
            .add_sheet(sheet)
            .map_err(|reason| SynchroError::sheet_creation(sheet_name, reason))?;
        self.events.emit(PipelineEvent::SheetCreated {
            sheet: sheet_name.to_string(),
        });
        Ok((sheet, replaced_existing))
    }

    fn write_header(&self, sheet: &mut Worksheet, group: &ClassificationGroup) {
        let (desc_col, desc_row) = self.layout.description;
        let (code_col, code_row) = self.layout.code;
        let description_cell = coordinate_from_index(&desc_col, &desc_row);
        let code_cell = coordinate_from_index(&code_col, &code_row);
        sheet
            .get_cell_mut(description_cell.as_str())
            .set_value(group.description.clone());
        sheet
            .get_cell_mut(code_cell.as_str())
            .set_value(group.code.clone());

        self.events.emit(PipelineEvent::HeaderWritten {
            sheet: group.code.clone(),
            description_cell,
            code_cell,
        });
    }

    /// Insert the rows a group needs past the reserved block and give them
    /// the fixed style. Returns how many rows were inserted.
    fn expand_capacity(&self, sheet: &mut Worksheet, type_count: usize) -> u32 {
        let reserved = self.layout.reserved_rows as usize;
        if type_count <= reserved {
            return 0;
        }
        let count = (type_count - reserved) as u32;
        let at_row = self.layout.name.1 + self.layout.reserved_rows;
        sheet.insert_new_row(&at_row, &count);

        let sheet_name = sheet.get_name().to_string();
        self.events.emit(PipelineEvent::RowsInserted {
            sheet: sheet_name.clone(),
            at_row,
            count,
        });

        let last_col = sheet
            .get_highest_column()
            .max(self.layout.name.0)
            .max(self.layout.quantity.0)
            .max(self.layout.unit.0);
        for row in at_row..at_row + count {
            self.clear_merges(sheet, &sheet_name, row);
            for col in 1..=last_col {
                apply_row_style(sheet.get_style_mut((col, row)), self.row_style);
            }
        }
        count
    }

    fn write_rows(&self, sheet: &mut Worksheet, group: &ClassificationGroup) -> usize {
        let (name_col, name_row) = self.layout.name;
        let (qty_col, qty_row) = self.layout.quantity;
        let (unit_col, unit_row) = self.layout.unit;

        for (offset, element) in group.elements.iter().enumerate() {
            let offset = offset as u32;
            for row in [name_row + offset, qty_row + offset, unit_row + offset] {
                self.clear_merges(sheet, &group.code, row);
            }

            sheet
                .get_cell_mut((name_col, name_row + offset))
                .set_value(element.name.clone());
            sheet
                .get_cell_mut((qty_col, qty_row + offset))
                .set_value_number(element.quantity.amount);
            sheet
                .get_cell_mut((unit_col, unit_row + offset))
                .set_value(element.quantity.unit.to_string());
        }
        group.elements.len()
    }

    fn clear_merges(&self, sheet: &mut Worksheet, sheet_name: &str, row: u32) {
        for range in unmerge_row(sheet, row) {
            self.events.emit(PipelineEvent::CellsUnmerged {
                sheet: sheet_name.to_string(),
                range,
            });
        }
    }
}

/// Excel's sheet naming rules.
pub fn validate_sheet_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("sheet name cannot be empty or whitespace-only".to_string());
    }
    let len = name.chars().count();
    if len > MAX_SHEET_NAME_LEN {
        return Err(format!(
            "sheet name exceeds maximum length of {MAX_SHEET_NAME_LEN} characters (got {len})"
        ));
    }
    if let Some(invalid) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(format!("sheet name contains invalid character '{invalid}'"));
    }
    if name.eq_ignore_ascii_case("History") {
        return Err("'History' is a reserved sheet name".to_string());
    }
    Ok(())
}
