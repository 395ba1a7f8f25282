use log::debug;

use std::fmt::Display;
use std::str::FromStr;

use crate::model::ReportError;

/// The fields of a report that are read from loosely named columns.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum SemanticField {
    Team,
    RmName,
    Duration,
}

impl SemanticField {
    pub const ALL: [SemanticField; 3] = [
        SemanticField::Team,
        SemanticField::RmName,
        SemanticField::Duration,
    ];

    /// Accepted header names, highest priority first.
    ///
    /// The matching is case-sensitive and only the sheet headers are trimmed,
    /// so `"Name "` can only be matched by a header that kept its trailing space.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            SemanticField::Team => &["Franchise", "Team Name", "Team", "franchise"],
            SemanticField::RmName => &["Name", "Sl. Name", "RM Name", "Name ", "Name."],
            SemanticField::Duration => &["Call Duration", "CallDuration", "Duration", "call duration"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SemanticField::Team => "team",
            SemanticField::RmName => "rm",
            SemanticField::Duration => "duration",
        }
    }
}

impl Display for SemanticField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticField::Team => write!(f, "team"),
            SemanticField::RmName => write!(f, "RM name"),
            SemanticField::Duration => write!(f, "call duration"),
        }
    }
}

impl FromStr for SemanticField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<SemanticField, ReportError> {
        match s.to_lowercase().as_str() {
            "team" | "franchise" => Ok(SemanticField::Team),
            "rm" | "rm_name" | "name" => Ok(SemanticField::RmName),
            "duration" | "call_duration" => Ok(SemanticField::Duration),
            _ => Err(ReportError::UnknownField(s.to_string())),
        }
    }
}

/// A header of the sheet that was picked for a field.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedColumn {
    pub header: String,
    pub index: usize,
}

/// Finds the first candidate of the field that names a column of the sheet.
pub fn resolve_column(field: SemanticField, headers: &[String]) -> Option<ResolvedColumn> {
    for cand in field.candidates() {
        if let Some(index) = headers.iter().position(|h| h.trim() == *cand) {
            return Some(ResolvedColumn {
                header: cand.to_string(),
                index,
            });
        }
    }
    None
}

/// The resolved columns of one sheet. Computed once per upload.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnMap {
    pub team: Option<ResolvedColumn>,
    pub rm_name: Option<ResolvedColumn>,
    pub duration: Option<ResolvedColumn>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> ColumnMap {
        let res = ColumnMap {
            team: resolve_column(SemanticField::Team, headers),
            rm_name: resolve_column(SemanticField::RmName, headers),
            duration: resolve_column(SemanticField::Duration, headers),
        };
        debug!("ColumnMap::resolve: headers: {:?} -> {:?}", headers, res);
        res
    }

    pub fn get(&self, field: SemanticField) -> Option<&ResolvedColumn> {
        match field {
            SemanticField::Team => self.team.as_ref(),
            SemanticField::RmName => self.rm_name.as_ref(),
            SemanticField::Duration => self.duration.as_ref(),
        }
    }

    pub fn header(&self, field: SemanticField) -> Option<String> {
        self.get(field).map(|c| c.header.clone())
    }

    /// The column of a field the caller cannot do without.
    pub fn require(&self, field: SemanticField) -> Result<&ResolvedColumn, ReportError> {
        self.get(field).ok_or(ReportError::MissingColumn(field))
    }

    pub fn require_all(&self, fields: &[SemanticField]) -> Result<(), ReportError> {
        for field in fields {
            self.require(*field)?;
        }
        Ok(())
    }
}
