use log::{debug, info, warn};

use audit_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command, ReportArgs};
use crate::audit::config_reader::*;

pub mod config_reader;
mod io_common;
pub mod io_excel;
pub mod status_log;
pub mod uploads;

#[derive(Debug, Snafu)]
pub enum AuditError {
    #[snafu(display("Failed to read Excel {path}: {source}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Unsupported file type {path:?} (accepted: .xlsx, .xls, .xlsm)"))]
    UnsupportedExtension { path: String },
    #[snafu(display("File not found: {path}"))]
    UploadNotFound { path: String },
    #[snafu(display("No upload found in {dir}"))]
    NoUploadFound { dir: String },
    #[snafu(display("Error listing uploads in {dir}"))]
    ListingUploads {
        source: std::io::Error,
        dir: String,
    },
    #[snafu(display("Error copying {from} to {to}"))]
    CopyingUpload {
        source: std::io::Error,
        from: String,
        to: String,
    },
    #[snafu(display("Error creating directory {path}"))]
    CreatingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid configuration value for {key}: {value}"))]
    InvalidConfig { key: String, value: String },
    #[snafu(display("No JSON received"))]
    EmptyPayload {},
    #[snafu(display("Error writing the status log {path}: {source}"))]
    StatusLog { source: csv::Error, path: String },
    #[snafu(display("Error writing the status log {path}: {source}"))]
    StatusLogIo {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Report { source: ReportError },
    #[snafu(display("Difference detected between the report and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type AuditResult<T> = Result<T, AuditError>;

fn opt_js(x: Option<f64>) -> JSValue {
    x.map(|v| json!(v)).unwrap_or(JSValue::Null)
}

fn score_stats_to_json(s: &ScoreStats) -> JSValue {
    json!({
        "count": s.count,
        "mean": opt_js(s.mean),
        "median": opt_js(s.median),
        "std": opt_js(s.std_dev),
    })
}

fn rm_summaries_to_json(rms: &[RmSummary]) -> Vec<JSValue> {
    rms.iter()
        .map(|rm| json!({"rm": rm.rm_name, "audits": rm.audit_count, "mean": rm.mean}))
        .collect()
}

/// The report in the JSON layout consumed by the document renderer.
pub fn report_to_json(report: &AuditReport) -> JSValue {
    let teams: Vec<JSValue> = report
        .teams
        .iter()
        .map(|t| {
            json!({
                "team": t.team,
                "audits": t.audit_count,
                "percent": score_stats_to_json(&t.score),
                "meanCallMinutes": opt_js(t.mean_call_minutes),
            })
        })
        .collect();

    let parameters: Vec<JSValue> = report
        .parameter_averages
        .iter()
        .map(|pa| {
            json!({
                "parameter": pa.parameter.header(),
                "count": pa.count,
                "mean": opt_js(pa.mean),
            })
        })
        .collect();

    let mut js = json!({
        "mode": report.mode.to_string(),
        "title": report.title,
        "columns": {
            "team": report.team_column,
            "rm": report.rm_column,
            "duration": report.duration_column,
            "percent": report.percent_source.describe(),
        },
    });

    match report.mode {
        ReportMode::Full => {
            let overall = report.overall.clone().unwrap_or_default();
            js["overall"] = json!({
                "audits": overall.audit_count,
                "percent": score_stats_to_json(&overall.score),
            });
            js["parameterAverages"] = JSValue::Array(parameters);
            js["teams"] = JSValue::Array(teams);
            js["trend"] = match &report.trend {
                Some(t) => json!({
                    "slope": t.slope,
                    "intercept": t.intercept,
                    "rSquared": t.r_squared,
                    "points": t.points,
                }),
                None => JSValue::Null,
            };
        }
        ReportMode::Team => {
            js["teams"] = JSValue::Array(teams);
        }
        ReportMode::Rm => {
            let ranking = report.rm_ranking.clone().unwrap_or_default();
            js["ranking"] = JSValue::Array(rm_summaries_to_json(&ranking.entries));
            js["top"] = JSValue::Array(rm_summaries_to_json(&report.top_rms));
            js["bottom"] = JSValue::Array(rm_summaries_to_json(&report.bottom_rms));
        }
    }
    js
}

fn report_options(args: &ReportArgs, config: &AuditConfig) -> AuditResult<ReportOptions> {
    let mode = match &args.mode {
        Some(m) => m.parse::<ReportMode>().context(ReportSnafu {})?,
        None => config.report_mode()?.unwrap_or(ReportMode::Full),
    };
    let mut options = ReportOptions::new(mode);
    if let Some(n) = args.top.or(config.top_n()?) {
        options.top_n = n;
    }
    options.required = if args.require.is_empty() {
        config.required_columns()?
    } else {
        args.require
            .iter()
            .map(|s| s.parse::<SemanticField>())
            .collect::<Result<Vec<SemanticField>, ReportError>>()
            .context(ReportSnafu {})?
    };
    Ok(options)
}

fn select_input(args: &ReportArgs, upload_dir: &Path) -> AuditResult<PathBuf> {
    if let Some(input) = &args.input {
        uploads::check_extension(input)?;
        let p = PathBuf::from(input);
        ensure!(p.is_file(), UploadNotFoundSnafu { path: input.clone() });
        Ok(p)
    } else {
        uploads::resolve_upload(upload_dir, args.filename.as_deref())
    }
}

fn write_output(
    args: &ReportArgs,
    config: &AuditConfig,
    mode: ReportMode,
    contents: &str,
) -> AuditResult<()> {
    let out_path: PathBuf = match args.out.as_deref() {
        Some("stdout") => {
            println!("{}", contents);
            return Ok(());
        }
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => {
            let dir = config.reports_dir();
            fs::create_dir_all(&dir).context(CreatingDirSnafu {
                path: dir.display().to_string(),
            })?;
            dir.join(io_common::report_file_name(mode))
        }
    };
    let out_s = out_path.display().to_string();
    fs::write(&out_path, contents).context(WritingReportSnafu { path: out_s.clone() })?;
    info!("Report written to {}", out_s);
    println!("{}", out_s);
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> AuditResult<()> {
    let contents = fs::read_to_string(reference_path).context(OpeningJsonSnafu {
        path: reference_path,
    })?;
    let reference: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_reference != pretty_js {
        warn!("Found differences with the reference report");
        print_diff(pretty_reference.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Report matches the reference {}", reference_path);
    Ok(())
}

pub fn run_report(args: &ReportArgs, config: &AuditConfig) -> AuditResult<()> {
    let options = report_options(args, config)?;
    let input = select_input(args, &config.upload_dir())?;
    let input_s = input.display().to_string();
    info!(
        "Generating {} report from {:?}",
        options.mode,
        io_common::simplify_file_name(&input_s)
    );

    let worksheet = args.worksheet.clone().or_else(|| config.worksheet_name.clone());
    let sheet = io_excel::read_sheet(&input_s, worksheet.as_deref())?;
    let report = audit_stats::run_report(&sheet, &options).context(ReportSnafu {})?;

    let js = report_to_json(&report);
    let pretty_js = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {})?;
    debug!("run_report: {}", pretty_js);
    write_output(args, config, options.mode, &pretty_js)?;

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(())
}

pub fn run_upload(file: &str, config: &AuditConfig) -> AuditResult<()> {
    let dest = uploads::store_upload(file, &config.upload_dir())?;
    let name = io_common::simplify_file_name(&dest.display().to_string());
    info!("Stored upload {} as {}", file, name);
    println!("{}", name);
    Ok(())
}

fn read_payload(payload: Option<&str>) -> AuditResult<String> {
    match payload {
        None | Some("-") => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context(OpeningJsonSnafu { path: "stdin" })?;
            Ok(s)
        }
        Some(p) => fs::read_to_string(p).context(OpeningJsonSnafu { path: p }),
    }
}

pub fn run_save_status(payload: Option<&str>, config: &AuditConfig) -> AuditResult<()> {
    let contents = read_payload(payload)?;
    let js: JSValue = if contents.trim().is_empty() {
        JSValue::Null
    } else {
        serde_json::from_str(&contents).context(ParsingJsonSnafu {})?
    };
    let ack = status_log::save_status(&config.reports_dir(), &js)?;
    let pretty = serde_json::to_string_pretty(&ack).context(ParsingJsonSnafu {})?;
    println!("{}", pretty);
    Ok(())
}

/// Loads the configuration, applies the command line overrides and runs the command.
pub fn run(args: &Args) -> AuditResult<()> {
    let mut config = match &args.config {
        Some(p) => read_config(p)?,
        None => AuditConfig::default(),
    };
    if let Some(d) = &args.uploads_dir {
        config.upload_directory = Some(d.clone());
    }
    if let Some(d) = &args.reports_dir {
        config.reports_directory = Some(d.clone());
    }
    debug!("run: config: {:?}", config);

    match &args.command {
        Command::Upload { file } => run_upload(file, &config),
        Command::Report(report_args) => run_report(report_args, &config),
        Command::SaveStatus { payload } => run_save_status(payload.as_deref(), &config),
    }
}
