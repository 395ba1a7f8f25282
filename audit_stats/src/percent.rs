use log::debug;

use crate::model::{Cell, Sheet};

pub const PERCENT_COLUMN: &str = "%age";
pub const TOTAL_SCORE_COLUMN: &str = "Total Score";
pub const TOTAL_COLUMN: &str = "Total";

/// Where the percent score of a row comes from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PercentSource {
    /// The sheet has a `%age` column. It is used as it is.
    Column(usize),
    /// Computed from the `Total Score` and `Total` columns.
    Derived { total_score: usize, total: usize },
    Unavailable,
}

impl PercentSource {
    pub fn detect(sheet: &Sheet) -> PercentSource {
        let res = match (
            sheet.column_index(PERCENT_COLUMN),
            sheet.column_index(TOTAL_SCORE_COLUMN),
            sheet.column_index(TOTAL_COLUMN),
        ) {
            (Some(idx), _, _) => PercentSource::Column(idx),
            (None, Some(total_score), Some(total)) => PercentSource::Derived { total_score, total },
            _ => PercentSource::Unavailable,
        };
        debug!("PercentSource::detect: {:?}", res);
        res
    }

    pub fn percent_for(&self, row: &[Cell]) -> Option<f64> {
        let cell = |idx: usize| row.get(idx).and_then(|c| c.as_number());
        match *self {
            PercentSource::Column(idx) => cell(idx),
            PercentSource::Derived { total_score, total } => {
                derive_percent(cell(total_score), cell(total))
            }
            PercentSource::Unavailable => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PercentSource::Column(_) => "column",
            PercentSource::Derived { .. } => "derived",
            PercentSource::Unavailable => "unavailable",
        }
    }
}

/// `total_score / total * 100`, missing when an operand is missing or the total is zero.
pub fn derive_percent(total_score: Option<f64>, total: Option<f64>) -> Option<f64> {
    match (total_score, total) {
        (Some(s), Some(t)) if t != 0.0 => Some(s / t * 100.0).filter(|x| x.is_finite()),
        _ => None,
    }
}
