pub mod analysis;
pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod logging;
pub mod model;
pub mod report;
pub mod styles;
pub mod utils;
pub mod workbook;
pub mod writer;

pub use config::{CellLayout, CliArgs, FieldNames, RowStyle, SynchroConfig};
pub use error::{SynchroError, SynchroResult};
pub use events::{PipelineEvent, PipelineEvents, RecordingEvents, TracingEvents};
pub use logging::{LoggingConfig, init_logging};
pub use model::{CellValue, ClassificationGroup, Quantity, Row, RowTable, TypeGroup, Unit};
pub use report::{RunReport, SkippedSheet};
pub use writer::{SheetOutcome, SheetWriter};

use analysis::build_classification_groups;
use loader::load_row_table;
use logging::sheet_span;
use utils::path_to_forward_slashes;
use workbook::{TargetWorkbook, save_workbook};

/// Load the source table and build every classification group, without
/// opening the target workbook.
pub fn plan(
    config: &SynchroConfig,
    events: &dyn PipelineEvents,
) -> SynchroResult<Vec<ClassificationGroup>> {
    config.validate()?;
    let table = load_row_table(&config.source_path, &config.fields, events)?;
    Ok(build_classification_groups(&table, &config.fields, events))
}

/// Write one sheet per classification group into a copy of the target
/// workbook and save it to the output path.
///
/// Groups whose sheet cannot be created are skipped and listed in the report.
/// Any other error aborts the run before anything is saved.
pub fn run(config: &SynchroConfig, events: &dyn PipelineEvents) -> SynchroResult<RunReport> {
    let groups = plan(config, events)?;

    let mut target = TargetWorkbook::open(&config.target_path)?;
    tracing::info!(
        path = %path_to_forward_slashes(&target.path),
        bytes = target.bytes,
        last_modified = ?target.last_modified.map(|t| t.to_rfc3339()),
        sheet_count = target.sheet_names().len(),
        "target workbook opened"
    );

    let writer = SheetWriter::new(config, events)?;
    let mut report = RunReport::new(&config.output_path, groups.len());
    report.target_modified = target.last_modified;

    for (index, group) in groups.iter().enumerate() {
        let _span = sheet_span(&group.code).entered();
        match writer.write_group(&mut target.book, group) {
            Ok(outcome) => report.add_written(outcome),
            Err(err) if err.is_recoverable() => {
                events.emit(PipelineEvent::SheetSkipped {
                    sheet: group.code.clone(),
                    reason: err.to_string(),
                });
                report.add_skipped(index, &group.code, &err);
            }
            Err(err) => {
                tracing::error!(category = err.category(), error = %err, "run aborted");
                return Err(err);
            }
        }
    }

    save_workbook(&target.book, &config.output_path)?;
    events.emit(PipelineEvent::WorkbookSaved {
        path: path_to_forward_slashes(&config.output_path),
        sheets_written: report.summary.sheets_written,
    });

    Ok(report.finalize())
}
