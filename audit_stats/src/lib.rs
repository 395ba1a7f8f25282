mod model;
use log::info;

pub mod aggregate;
pub mod builder;
pub mod columns;
pub mod duration;
pub mod manual;
pub mod percent;
pub mod records;
pub mod report;
pub mod stats;

pub use crate::columns::{ColumnMap, ResolvedColumn, SemanticField};
pub use crate::model::*;
pub use crate::records::{normalize_sheet, NormalizedSheet};
pub use crate::report::{build_report, AuditReport, ReportMode, ReportOptions};

/// Runs the whole pipeline on one sheet: column resolution, normalization of
/// every row, then the aggregation required by the report mode.
///
/// Arguments:
/// * `sheet` the uploaded worksheet. It is only read.
/// * `options` the report to produce
///
/// Cells that cannot be read make the matching values missing. The only
/// failure is a field listed in `options.required` with no matching column.
pub fn run_report(sheet: &Sheet, options: &ReportOptions) -> Result<AuditReport, ReportError> {
    info!(
        "run_report: processing {} rows, mode: {}, options: {:?}",
        sheet.rows.len(),
        options.mode,
        options
    );
    let normalized = normalize_sheet(sheet);
    build_report(&normalized, options)
}
