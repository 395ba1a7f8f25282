pub use crate::model::*;

/// A builder for assembling a sheet row by row.
///
/// Workbook readers produce a [`Sheet`] directly; the builder is meant for
/// programs that collect audit rows from other sources.
///
/// ```
/// use audit_stats::builder::SheetBuilder;
/// use audit_stats::{Cell, ReportError};
///
/// let mut builder = SheetBuilder::new(&["Team", "%age"]);
/// builder.add_row(vec!["North".into(), Cell::Number(82.5)])?;
/// builder.add_row_text(&["South", "71"])?;
///
/// let sheet = builder.build();
/// assert_eq!(sheet.rows.len(), 2);
/// # Ok::<(), ReportError>(())
/// ```
pub struct SheetBuilder {
    pub(crate) _header: Vec<String>,
    pub(crate) _rows: Vec<Vec<Cell>>,
}

impl SheetBuilder {
    pub fn new(header: &[&str]) -> SheetBuilder {
        SheetBuilder {
            _header: header.iter().map(|s| s.to_string()).collect(),
            _rows: Vec::new(),
        }
    }

    /// Adds a row. Rows shorter than the header are completed with empty cells.
    pub fn add_row(&mut self, cells: Vec<Cell>) -> Result<(), ReportError> {
        if cells.len() > self._header.len() {
            return Err(ReportError::RaggedRow {
                row: self._rows.len(),
                width: cells.len(),
            });
        }
        self._rows.push(cells);
        Ok(())
    }

    /// Adds a row of text values, the way they would be typed in a form.
    /// Empty strings are empty cells.
    pub fn add_row_text(&mut self, values: &[&str]) -> Result<(), ReportError> {
        self.add_row(values.iter().map(|s| Cell::from(*s)).collect())
    }

    pub fn build(self) -> Sheet {
        Sheet::new(self._header, self._rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_rejected() {
        let mut b = SheetBuilder::new(&["Team"]);
        assert_eq!(
            b.add_row_text(&["A", "B"]),
            Err(ReportError::RaggedRow { row: 0, width: 2 })
        );
        b.add_row_text(&[]).unwrap();
        let sheet = b.build();
        assert_eq!(sheet.rows, vec![vec![Cell::Empty]]);
    }
}
