use log::debug;

use std::error::Error;
use std::fmt::Display;

use crate::model::Cell;

/// Why a call duration could not be read.
#[derive(PartialEq, Debug, Clone)]
pub enum DurationError {
    Blank,
    /// A `:`-separated value that is neither `H:M:S` nor `M:S`.
    WrongPartCount(usize),
    NotANumber(String),
}

impl Error for DurationError {}

impl Display for DurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationError::Blank => write!(f, "blank duration"),
            DurationError::WrongPartCount(n) => {
                write!(f, "expected 2 or 3 ':'-separated parts, found {}", n)
            }
            DurationError::NotANumber(s) => write!(f, "not a number: {:?}", s),
        }
    }
}

fn parse_float(s: &str) -> Result<f64, DurationError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| DurationError::NotANumber(s.to_string()))
}

/// Reads a call duration in minutes.
///
/// Accepted forms are `H:M:S`, `M:S` and a bare number of minutes.
pub fn parse_duration(cell: &Cell) -> Result<f64, DurationError> {
    let s = match cell.as_text() {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(DurationError::Blank),
    };
    if s.contains(':') {
        let parts: Vec<f64> = s
            .split(':')
            .map(parse_float)
            .collect::<Result<Vec<f64>, DurationError>>()?;
        match parts.as_slice() {
            [h, m, sec] => Ok(h * 60.0 + m + sec / 60.0),
            [m, sec] => Ok(m + sec / 60.0),
            _ => Err(DurationError::WrongPartCount(parts.len())),
        }
    } else {
        parse_float(&s)
    }
}

/// The duration in minutes, or missing. Never fails.
pub fn normalize_duration(cell: &Cell) -> Option<f64> {
    match parse_duration(cell) {
        Ok(x) if x.is_finite() => Some(x),
        Ok(x) => {
            debug!("normalize_duration: dropping non-finite value {:?}", x);
            None
        }
        Err(DurationError::Blank) => None,
        Err(e) => {
            debug!("normalize_duration: {:?}: {}", cell, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn hours_minutes_seconds() {
        let x = parse_duration(&text("1:02:30")).unwrap();
        assert!(close(x, 62.5));
        let x = parse_duration(&text("00:04:45")).unwrap();
        assert!(close(x, 4.75));
    }

    #[test]
    fn minutes_seconds() {
        let x = parse_duration(&text("3:30")).unwrap();
        assert!(close(x, 3.5));
        let x = parse_duration(&text(" 12 : 06 ")).unwrap();
        assert!(close(x, 12.1));
    }

    #[test]
    fn bare_numbers_are_minutes() {
        assert_eq!(parse_duration(&text("7.25")), Ok(7.25));
        assert_eq!(parse_duration(&Cell::Number(4.0)), Ok(4.0));
    }

    #[test]
    fn failures_are_reported() {
        assert_eq!(parse_duration(&Cell::Empty), Err(DurationError::Blank));
        assert_eq!(parse_duration(&text("   ")), Err(DurationError::Blank));
        assert_eq!(
            parse_duration(&text("1:2:3:4")),
            Err(DurationError::WrongPartCount(4))
        );
        assert_eq!(
            parse_duration(&text("4 min")),
            Err(DurationError::NotANumber("4 min".to_string()))
        );
        assert!(matches!(
            parse_duration(&text("ab:cd")),
            Err(DurationError::NotANumber(_))
        ));
        assert!(parse_duration(&Cell::Bool(true)).is_err());
    }

    #[test]
    fn normalization_degrades_to_missing() {
        for garbage in ["", "??", "1:", ":", "1:2:3:4", "inf", "NaN", "12 mins"] {
            assert_eq!(normalize_duration(&text(garbage)), None, "{:?}", garbage);
        }
        assert_eq!(normalize_duration(&Cell::Empty), None);
        assert_eq!(normalize_duration(&text("2:30")), Some(2.5));
    }
}
