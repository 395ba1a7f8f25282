// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use crate::columns::SemanticField;

/// The content of one spreadsheet cell, as handed over by a workbook reader.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// The string form of the cell, `None` for empty cells.
    /// Whole numbers render without a fractional part (`3.0` becomes `3`).
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    /// Lenient numeric view: numbers as they are, text parsed after trimming.
    /// Anything else, including non-finite values, is missing.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty | Cell::Bool(_) => None,
        };
        x.filter(|v| v.is_finite())
    }

    /// The value used as a grouping key (team, RM name). Blank cells have no label.
    pub fn as_label(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            self.as_text()
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Cell {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Cell {
        Cell::Number(x)
    }
}

impl From<Option<f64>> for Cell {
    fn from(x: Option<f64>) -> Cell {
        x.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

/// A worksheet: one header row and the data rows below it.
///
/// Header names are trimmed of surrounding whitespace on construction and every
/// row has exactly as many cells as the header.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Sheet {
        let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Sheet { header, rows }
    }

    /// Position of the first column with exactly this (trimmed) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

/// The eleven scoring parameters of the audit form.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum ScoringParameter {
    Introduction,
    ProjectRegistration,
    ProductPricingRequirement,
    ProductFeedback,
    CrossUpsell,
    MarketingBenefit,
    Redemption,
    CallClosure,
    GtmAdherence,
    CrmUpdate,
    Softskill,
}

impl ScoringParameter {
    pub const ALL: [ScoringParameter; 11] = [
        ScoringParameter::Introduction,
        ScoringParameter::ProjectRegistration,
        ScoringParameter::ProductPricingRequirement,
        ScoringParameter::ProductFeedback,
        ScoringParameter::CrossUpsell,
        ScoringParameter::MarketingBenefit,
        ScoringParameter::Redemption,
        ScoringParameter::CallClosure,
        ScoringParameter::GtmAdherence,
        ScoringParameter::CrmUpdate,
        ScoringParameter::Softskill,
    ];

    /// The column header used for this parameter, in the sheets and in the status log.
    /// The spelling (including `Redem tion`) is the one found in the audit forms.
    pub fn header(&self) -> &'static str {
        match self {
            ScoringParameter::Introduction => "Introduction",
            ScoringParameter::ProjectRegistration => "Project Registration",
            ScoringParameter::ProductPricingRequirement => "Product & Pricing requirement",
            ScoringParameter::ProductFeedback => "Product FeedBack",
            ScoringParameter::CrossUpsell => "Cross & upsell of product",
            ScoringParameter::MarketingBenefit => "Marketing Benefit",
            ScoringParameter::Redemption => "Redem tion",
            ScoringParameter::CallClosure => "Call Closure",
            ScoringParameter::GtmAdherence => "GTM Adherence",
            ScoringParameter::CrmUpdate => "CRM Update",
            ScoringParameter::Softskill => "Softskill",
        }
    }

    pub fn from_header(header: &str) -> Option<ScoringParameter> {
        ScoringParameter::ALL
            .iter()
            .find(|p| p.header() == header)
            .copied()
    }
}

impl Display for ScoringParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// One row of the uploaded sheet after normalization.
#[derive(PartialEq, Debug, Clone)]
pub struct AuditRecord {
    /// Every column of the row, in sheet order.
    pub raw_columns: Vec<(String, Cell)>,
    pub team: Option<String>,
    pub rm_name: Option<String>,
    pub percent_score: Option<f64>,
    pub call_minutes: Option<f64>,
    /// Only the parameters that have a column in the sheet.
    pub parameters: Vec<(ScoringParameter, Option<f64>)>,
}

impl AuditRecord {
    pub fn raw(&self, header: &str) -> Option<&Cell> {
        self.raw_columns
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, c)| c)
    }

    pub fn parameter(&self, parameter: ScoringParameter) -> Option<f64> {
        self.parameters
            .iter()
            .find(|(p, _)| *p == parameter)
            .and_then(|(_, v)| *v)
    }
}

// ******** Output data structures *********

/// Descriptive statistics over the non-missing percent scores of a set of records.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation, missing with fewer than two values.
    pub std_dev: Option<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TeamSummary {
    pub team: String,
    /// Number of rows in the team, scored or not.
    pub audit_count: usize,
    pub score: ScoreStats,
    pub mean_call_minutes: Option<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RmSummary {
    pub rm_name: String,
    pub audit_count: usize,
    pub mean: f64,
}

/// RM summaries ordered from the highest mean percent score to the lowest.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RmRanking {
    pub entries: Vec<RmSummary>,
}

impl RmRanking {
    /// The `n` best ranked RMs, best first.
    pub fn top(&self, n: usize) -> &[RmSummary] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The `n` lowest ranked RMs, kept in ranking order (the lowest mean comes last).
    pub fn bottom(&self, n: usize) -> &[RmSummary] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ParameterAverage {
    pub parameter: ScoringParameter,
    pub count: usize,
    pub mean: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct OverallStats {
    /// All the records of the sheet, including the ones without a score.
    pub audit_count: usize,
    pub score: ScoreStats,
}

/// Least-squares line of the percent score against the call duration in minutes.
#[derive(PartialEq, Debug, Clone)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub points: usize,
}

/// Errors that prevent a report from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportError {
    /// A field was explicitly requested but no header of the sheet matches it.
    MissingColumn(SemanticField),
    InvalidMode(String),
    UnknownField(String),
    /// A row handed to the builder is wider than the header.
    RaggedRow { row: usize, width: usize },
}

impl Error for ReportError {}

impl Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::MissingColumn(field) => write!(
                f,
                "No {} column found in data (accepted headers: {:?})",
                field,
                field.candidates()
            ),
            ReportError::InvalidMode(m) => write!(f, "Invalid report mode {:?}", m),
            ReportError::UnknownField(s) => write!(f, "Unknown column field {:?}", s),
            ReportError::RaggedRow { row, width } => {
                write!(f, "Row {} has {} cells, more than the header", row, width)
            }
        }
    }
}
