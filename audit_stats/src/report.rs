use log::info;

use std::fmt::Display;
use std::str::FromStr;

use crate::aggregate::*;
use crate::columns::SemanticField;
use crate::model::*;
use crate::percent::PercentSource;
use crate::records::NormalizedSheet;

/// The three reports that can be requested for an upload.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ReportMode {
    /// Overall statistics, parameter averages, team breakdown and trend.
    Full,
    Team,
    Rm,
}

impl ReportMode {
    pub fn title(&self) -> &'static str {
        match self {
            ReportMode::Full => "Call Audit Analysis Report - Full",
            ReportMode::Team => "Call Audit - Team-wise Report",
            ReportMode::Rm => "Call Audit - RM Summary",
        }
    }

    /// Used to name the report files.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportMode::Full => "Full_Report",
            ReportMode::Team => "Teamwise_Report",
            ReportMode::Rm => "RM_Summary",
        }
    }
}

impl Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Full => write!(f, "full"),
            ReportMode::Team => write!(f, "team"),
            ReportMode::Rm => write!(f, "rm"),
        }
    }
}

impl FromStr for ReportMode {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<ReportMode, ReportError> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ReportMode::Full),
            "team" => Ok(ReportMode::Team),
            "rm" => Ok(ReportMode::Rm),
            _ => Err(ReportError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportOptions {
    pub mode: ReportMode,
    /// Size of the top and bottom RM lists.
    pub top_n: usize,
    /// Fields whose absence fails the report instead of leaving a section empty.
    pub required: Vec<SemanticField>,
}

impl ReportOptions {
    pub const DEFAULT_TOP_N: usize = 5;

    pub fn new(mode: ReportMode) -> ReportOptions {
        ReportOptions {
            mode,
            top_n: ReportOptions::DEFAULT_TOP_N,
            required: Vec::new(),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::new(ReportMode::Full)
    }
}

/// Everything needed to lay out a report. Sections that do not belong to the
/// requested mode are left empty.
#[derive(PartialEq, Debug, Clone)]
pub struct AuditReport {
    pub mode: ReportMode,
    pub title: String,
    pub team_column: Option<String>,
    pub rm_column: Option<String>,
    pub duration_column: Option<String>,
    pub percent_source: PercentSource,
    pub overall: Option<OverallStats>,
    pub parameter_averages: Vec<ParameterAverage>,
    pub teams: Vec<TeamSummary>,
    pub rm_ranking: Option<RmRanking>,
    pub top_rms: Vec<RmSummary>,
    pub bottom_rms: Vec<RmSummary>,
    pub trend: Option<TrendFit>,
}

pub fn build_report(
    sheet: &NormalizedSheet,
    options: &ReportOptions,
) -> Result<AuditReport, ReportError> {
    sheet.columns.require_all(&options.required)?;
    let records = &sheet.records;

    let mut report = AuditReport {
        mode: options.mode,
        title: options.mode.title().to_string(),
        team_column: sheet.columns.header(SemanticField::Team),
        rm_column: sheet.columns.header(SemanticField::RmName),
        duration_column: sheet.columns.header(SemanticField::Duration),
        percent_source: sheet.percent_source,
        overall: None,
        parameter_averages: Vec::new(),
        teams: Vec::new(),
        rm_ranking: None,
        top_rms: Vec::new(),
        bottom_rms: Vec::new(),
        trend: None,
    };

    match options.mode {
        ReportMode::Full => {
            report.overall = Some(overall_stats(records));
            report.parameter_averages = parameter_averages(records, &sheet.parameters);
            report.teams = team_summaries(records);
            report.trend = trend_fit(records);
        }
        ReportMode::Team => {
            report.teams = team_summaries(records);
        }
        ReportMode::Rm => {
            let ranking = rm_ranking(records);
            report.top_rms = ranking.top(options.top_n).to_vec();
            report.bottom_rms = ranking.bottom(options.top_n).to_vec();
            report.rm_ranking = Some(ranking);
        }
    }

    log_report(&report);
    Ok(report)
}

fn fmt_opt(x: Option<f64>) -> String {
    x.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "N/A".to_string())
}

fn log_report(report: &AuditReport) {
    info!("{}", report.title);
    if let Some(overall) = &report.overall {
        info!(
            "Overall Average %: {} ({} audits, {} scored)",
            fmt_opt(overall.score.mean),
            overall.audit_count,
            overall.score.count
        );
    }
    for pa in report.parameter_averages.iter() {
        info!("      {}: {}", pa.parameter, fmt_opt(pa.mean));
    }
    for t in report.teams.iter() {
        info!(
            "Team: {} - Audits: {} Avg %: {} Median: {} Std: {} Avg Call Duration (min): {}",
            t.team,
            t.audit_count,
            fmt_opt(t.score.mean),
            fmt_opt(t.score.median),
            fmt_opt(t.score.std_dev),
            fmt_opt(t.mean_call_minutes)
        );
    }
    if let Some(ranking) = &report.rm_ranking {
        for rm in ranking.entries.iter() {
            info!("RM: {} Avg %: {:.2} Audits: {}", rm.rm_name, rm.mean, rm.audit_count);
        }
    }
    if let Some(trend) = &report.trend {
        info!(
            "Trend: %age = {:.3} * minutes + {:.3} (r2 {:.3}, {} calls)",
            trend.slope, trend.intercept, trend.r_squared, trend.points
        );
    }
}
