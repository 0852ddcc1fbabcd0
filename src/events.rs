//! Structured run events.
//!
//! Builders and the sheet writer report progress through [`PipelineEvents`]
//! instead of logging directly, so observability stays decoupled from what
//! gets written. [`TracingEvents`] forwards to `tracing`; [`RecordingEvents`]
//! keeps everything in memory for assertions.

use crate::model::Unit;
use serde::Serialize;
use std::cell::RefCell;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    TableLoaded {
        rows: usize,
        dropped_leading: usize,
    },
    ClassificationSkipped {
        rows: usize,
    },
    ClassificationBuilt {
        code: String,
        description: String,
        type_count: usize,
    },
    QuantityResolved {
        code: String,
        name: String,
        amount: f64,
        unit: Unit,
    },
    SheetReplaced {
        sheet: String,
    },
    SheetCreated {
        sheet: String,
    },
    HeaderWritten {
        sheet: String,
        description_cell: String,
        code_cell: String,
    },
    RowsInserted {
        sheet: String,
        at_row: u32,
        count: u32,
    },
    CellsUnmerged {
        sheet: String,
        range: String,
    },
    SheetSkipped {
        sheet: String,
        reason: String,
    },
    SheetCompleted {
        sheet: String,
        rows_written: usize,
    },
    WorkbookSaved {
        path: String,
        sheets_written: usize,
    },
}

pub trait PipelineEvents {
    fn emit(&self, event: PipelineEvent);
}

/// Forwards every event to `tracing` with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl PipelineEvents for TracingEvents {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::TableLoaded {
                rows,
                dropped_leading,
            } => info!(rows, dropped_leading, "source table loaded"),
            PipelineEvent::ClassificationSkipped { rows } => {
                debug!(rows, "rows without a classification code skipped")
            }
            PipelineEvent::ClassificationBuilt {
                code,
                description,
                type_count,
            } => info!(%code, %description, type_count, "classification group built"),
            PipelineEvent::QuantityResolved {
                code,
                name,
                amount,
                unit,
            } => debug!(%code, %name, amount, %unit, "quantity resolved"),
            PipelineEvent::SheetReplaced { sheet } => {
                info!(%sheet, "existing sheet removed before clone")
            }
            PipelineEvent::SheetCreated { sheet } => debug!(%sheet, "template cloned"),
            PipelineEvent::HeaderWritten {
                sheet,
                description_cell,
                code_cell,
            } => debug!(%sheet, %description_cell, %code_cell, "header written"),
            PipelineEvent::RowsInserted {
                sheet,
                at_row,
                count,
            } => info!(%sheet, at_row, count, "rows inserted past reserved block"),
            PipelineEvent::CellsUnmerged { sheet, range } => {
                debug!(%sheet, %range, "merge region cleared")
            }
            PipelineEvent::SheetSkipped { sheet, reason } => {
                warn!(%sheet, %reason, "sheet skipped")
            }
            PipelineEvent::SheetCompleted {
                sheet,
                rows_written,
            } => info!(%sheet, rows_written, "sheet populated"),
            PipelineEvent::WorkbookSaved {
                path,
                sheets_written,
            } => info!(%path, sheets_written, "workbook saved"),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: RefCell<Vec<PipelineEvent>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.borrow().clone()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&PipelineEvent) -> bool,
    {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl PipelineEvents for RecordingEvents {
    fn emit(&self, event: PipelineEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_emission_order() {
        let events = RecordingEvents::new();
        events.emit(PipelineEvent::SheetCreated {
            sheet: "Ss_25".into(),
        });
        events.emit(PipelineEvent::SheetCompleted {
            sheet: "Ss_25".into(),
            rows_written: 3,
        });

        let recorded = events.events();
        assert_eq!(recorded.len(), 2);
        assert!(matches!(recorded[0], PipelineEvent::SheetCreated { .. }));
        assert_eq!(
            events.count(|e| matches!(e, PipelineEvent::SheetCompleted { .. })),
            1
        );
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_value(PipelineEvent::RowsInserted {
            sheet: "Ss_25".into(),
            at_row: 32,
            count: 3,
        })
        .unwrap();
        assert_eq!(json["event"], "rows_inserted");
        assert_eq!(json["count"], 3);
    }
}
