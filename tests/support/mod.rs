#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pbs_synchro::{FieldNames, SynchroConfig};
use tempfile::{TempDir, tempdir};
use umya_spreadsheet::{self, Spreadsheet};

pub const TEMPLATE: &str = "PBS Template";
pub const FOOTER_ROW: u32 = 32;

/// One schedule line as exported from the model.
#[derive(Debug, Clone)]
pub struct ScheduleRow {
    pub code: &'static str,
    pub description: &'static str,
    pub instance: &'static str,
    pub type_name: &'static str,
    pub area: Option<f64>,
    pub length: Option<f64>,
}

impl ScheduleRow {
    pub fn new(code: &'static str, type_name: &'static str, instance: &'static str) -> Self {
        Self {
            code,
            description: "Walls",
            instance,
            type_name,
            area: None,
            length: None,
        }
    }

    pub fn described(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    fn fields(&self) -> [String; 6] {
        [
            self.code.to_string(),
            self.description.to_string(),
            self.instance.to_string(),
            self.type_name.to_string(),
            self.area.map(|a| a.to_string()).unwrap_or_default(),
            self.length.map(|l| l.to_string()).unwrap_or_default(),
        ]
    }
}

pub fn write_workbook_to_path<F>(path: &Path, f: F)
where
    F: FnOnce(&mut Spreadsheet),
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dir");
    }
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write workbook");
}

/// Add a template sheet: labels in column A, merged data rows 15..=31 and a
/// merged footer directly below the reserved block.
pub fn add_template_sheet(book: &mut Spreadsheet) {
    let sheet = book.new_sheet(TEMPLATE).expect("template sheet");
    sheet.get_cell_mut("A6").set_value("Description");
    sheet.get_cell_mut("A9").set_value("Code");
    sheet.get_cell_mut("A14").set_value("Element");
    sheet.get_cell_mut("D14").set_value("Qty");
    sheet.get_cell_mut("E14").set_value("Unit");
    for row in 15..FOOTER_ROW {
        sheet.add_merge_cells(format!("A{row}:C{row}"));
    }
    sheet
        .get_cell_mut(format!("A{FOOTER_ROW}").as_str())
        .set_value("Approved by");
}

pub fn template_book() -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    add_template_sheet(&mut book);
    book
}

pub struct TestWorkspace {
    _tempdir: TempDir,
    root: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let tempdir = tempdir().expect("tempdir");
        let root = tempdir.path().to_path_buf();
        Self {
            _tempdir: tempdir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn create_workbook<F>(&self, name: &str, f: F) -> PathBuf
    where
        F: FnOnce(&mut Spreadsheet),
    {
        let path = self.path(name);
        write_workbook_to_path(&path, f);
        path
    }

    /// Target workbook with a cover sheet and the template.
    pub fn create_target(&self, name: &str) -> PathBuf {
        self.create_workbook(name, |book| {
            let cover = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
            cover.set_name("Cover");
            cover.get_cell_mut("A1").set_value("Project PBS");
            add_template_sheet(book);
        })
    }

    /// CSV export with the default column names and an empty leading row.
    pub fn create_csv(&self, name: &str, rows: &[ScheduleRow]) -> PathBuf {
        let path = self.path(name);
        let fields = FieldNames::default();
        let mut writer = csv::Writer::from_path(&path).expect("csv writer");
        writer.write_record(fields.all()).expect("header");
        writer.write_record(["", "", "", "", "", ""]).expect("leading row");
        for row in rows {
            writer.write_record(row.fields()).expect("record");
        }
        writer.flush().expect("flush csv");
        path
    }

    /// Workbook export with the same shape as [`Self::create_csv`].
    pub fn create_xlsx_source(&self, name: &str, rows: &[ScheduleRow]) -> PathBuf {
        let fields = FieldNames::default();
        self.create_workbook(name, |book| {
            let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
            for (idx, field) in fields.all().iter().enumerate() {
                let col = idx as u32 + 1;
                sheet.get_cell_mut((col, 1)).set_value(field.to_string());
                // leading row that the loader drops
                sheet.get_cell_mut((col, 2)).set_value("-");
            }
            for (offset, row) in rows.iter().enumerate() {
                let row_idx = offset as u32 + 3;
                for (idx, value) in row.fields().iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    let cell = sheet.get_cell_mut((idx as u32 + 1, row_idx));
                    match value.parse::<f64>() {
                        Ok(number) if idx >= 4 => {
                            cell.set_value_number(number);
                        }
                        _ => {
                            cell.set_value(value.clone());
                        }
                    }
                }
            }
        })
    }

    pub fn config(&self, source: PathBuf, target: PathBuf) -> SynchroConfig {
        SynchroConfig {
            source_path: source,
            target_path: target,
            output_path: self.path("out/merged.xlsx"),
            ..SynchroConfig::default()
        }
    }
}

pub fn open(path: &Path) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path).expect("read workbook")
}

pub fn number_at(book: &Spreadsheet, sheet: &str, cell: &str) -> f64 {
    book.get_sheet_by_name(sheet)
        .expect("sheet")
        .get_value(cell)
        .parse()
        .expect("numeric cell")
}
