use std::path::Path;

use chrono::Local;

use audit_stats::ReportMode;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Time-stamped name of a generated report, e.g. `CallAudit_Full_Report_20240131_174502.json`.
pub fn report_file_name(mode: ReportMode) -> String {
    format!(
        "CallAudit_{}_{}.json",
        mode.file_stem(),
        Local::now().format("%Y%m%d_%H%M%S")
    )
}
