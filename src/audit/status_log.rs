use std::fs::OpenOptions;

use chrono::Local;
use csv::WriterBuilder;
use serde_json::{json, Map};

use crate::audit::*;

pub const STATUS_LOG_FILE: &str = "qa_status_log.csv";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Columns filled from the scoring form, in file order, around the scoring parameters.
const LEADING_COLUMNS: [&str; 7] = [
    "evaluator",
    "rm_name",
    "team_name",
    "rm_captain",
    "date_of_audit",
    "aid_mobile",
    "call_date",
];
const TRAILING_COLUMNS: [&str; 5] = ["Total Score", "Total", "%age", "Audit Observation", "status"];

/// The payload keys of one status row, without the timestamp.
pub fn payload_columns() -> Vec<&'static str> {
    let mut cols: Vec<&'static str> = LEADING_COLUMNS.to_vec();
    cols.extend(ScoringParameter::ALL.iter().map(|p| p.header()));
    cols.extend(TRAILING_COLUMNS);
    cols
}

/// The header row of the status log.
pub fn status_log_header() -> Vec<&'static str> {
    let mut header = vec!["timestamp"];
    header.extend(payload_columns());
    header
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StatusLogEntry {
    pub timestamp: String,
    pub values: Vec<String>,
}

impl StatusLogEntry {
    /// Builds the row for a scoring form. Keys that are not in the log are ignored.
    pub fn from_payload(payload: &JSValue, timestamp: String) -> AuditResult<StatusLogEntry> {
        let obj: &Map<String, JSValue> = match payload.as_object() {
            Some(obj) if !obj.is_empty() => obj,
            _ => return EmptyPayloadSnafu {}.fail(),
        };
        let values = payload_columns()
            .iter()
            .map(|col| match obj.get(*col) {
                None | Some(JSValue::Null) => "".to_string(),
                Some(JSValue::String(s)) => s.clone(),
                Some(v) => v.to_string(),
            })
            .collect();
        Ok(StatusLogEntry { timestamp, values })
    }

    pub fn record(&self) -> Vec<&str> {
        let mut rec = vec![self.timestamp.as_str()];
        rec.extend(self.values.iter().map(|s| s.as_str()));
        rec
    }
}

/// Appends one row, writing the header first when the file does not exist yet.
pub fn append_status(path: &Path, entry: &StatusLogEntry) -> AuditResult<()> {
    let path_s = path.display().to_string();
    let write_header = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(StatusLogIoSnafu { path: path_s.clone() })?;

    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    if write_header {
        debug!("append_status: creating {}", path_s);
        wtr.write_record(status_log_header())
            .context(StatusLogSnafu { path: path_s.clone() })?;
    }
    wtr.write_record(entry.record())
        .context(StatusLogSnafu { path: path_s.clone() })?;
    wtr.flush().context(StatusLogIoSnafu { path: path_s })?;
    Ok(())
}

/// Saves one scoring form in the status log of the reports directory.
pub fn save_status(reports_dir: &Path, payload: &JSValue) -> AuditResult<JSValue> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let entry = StatusLogEntry::from_payload(payload, timestamp)?;
    fs::create_dir_all(reports_dir).context(CreatingDirSnafu {
        path: reports_dir.display().to_string(),
    })?;
    let path = reports_dir.join(STATUS_LOG_FILE);
    append_status(&path, &entry)?;
    info!("Status saved to {}", path.display());
    Ok(json!({"success": true, "message": "Saved successfully"}))
}
