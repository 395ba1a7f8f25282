use log::{debug, info};

use crate::columns::{ColumnMap, SemanticField};
use crate::duration::normalize_duration;
use crate::model::{AuditRecord, Cell, ScoringParameter, Sheet};
use crate::percent::PercentSource;

/// A sheet turned into typed records, along with what was found in its header.
#[derive(PartialEq, Debug, Clone)]
pub struct NormalizedSheet {
    pub columns: ColumnMap,
    pub percent_source: PercentSource,
    /// The scoring parameters that have a column in the sheet, in form order.
    pub parameters: Vec<ScoringParameter>,
    pub records: Vec<AuditRecord>,
}

/// Resolves the columns of the sheet once, then normalizes every row.
///
/// A cell that cannot be read only makes the corresponding field missing
/// for that record.
pub fn normalize_sheet(sheet: &Sheet) -> NormalizedSheet {
    let columns = ColumnMap::resolve(&sheet.header);
    let percent_source = PercentSource::detect(sheet);
    let parameters: Vec<(ScoringParameter, usize)> = ScoringParameter::ALL
        .iter()
        .filter_map(|p| sheet.column_index(p.header()).map(|idx| (*p, idx)))
        .collect();
    info!(
        "normalize_sheet: {} rows, team: {:?}, rm: {:?}, duration: {:?}, percent: {}, {} scoring parameters",
        sheet.rows.len(),
        columns.header(SemanticField::Team),
        columns.header(SemanticField::RmName),
        columns.header(SemanticField::Duration),
        percent_source.describe(),
        parameters.len()
    );

    let records: Vec<AuditRecord> = sheet
        .rows
        .iter()
        .map(|row| normalize_row(&sheet.header, row, &columns, percent_source, &parameters))
        .collect();

    let missing_pct = records.iter().filter(|r| r.percent_score.is_none()).count();
    if missing_pct > 0 {
        debug!(
            "normalize_sheet: {} of {} records without a percent score",
            missing_pct,
            records.len()
        );
    }

    NormalizedSheet {
        columns,
        percent_source,
        parameters: parameters.iter().map(|(p, _)| *p).collect(),
        records,
    }
}

fn normalize_row(
    header: &[String],
    row: &[Cell],
    columns: &ColumnMap,
    percent_source: PercentSource,
    parameters: &[(ScoringParameter, usize)],
) -> AuditRecord {
    let cell = |field: SemanticField| columns.get(field).and_then(|c| row.get(c.index));

    AuditRecord {
        raw_columns: header.iter().cloned().zip(row.iter().cloned()).collect(),
        team: cell(SemanticField::Team).and_then(|c| c.as_label()),
        rm_name: cell(SemanticField::RmName).and_then(|c| c.as_label()),
        percent_score: percent_source.percent_for(row),
        call_minutes: cell(SemanticField::Duration).and_then(normalize_duration),
        parameters: parameters
            .iter()
            .map(|(p, idx)| (*p, row.get(*idx).and_then(|c| c.as_number())))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SheetBuilder;

    #[test]
    fn rows_become_records() {
        let mut b = SheetBuilder::new(&[
            "Franchise",
            "RM Name",
            "Call Duration",
            "Total Score",
            "Total",
            "Introduction",
            "Softskill",
        ]);
        b.add_row(vec![
            "North".into(),
            "Asha".into(),
            "00:05:30".into(),
            Cell::Number(17.0),
            Cell::Number(20.0),
            Cell::Number(80.0),
            "n/a".into(),
        ])
        .unwrap();
        b.add_row(vec![Cell::Empty, "  ".into(), "garbage".into(), Cell::Number(5.0), Cell::Number(0.0)])
            .unwrap();
        let ns = normalize_sheet(&b.build());

        assert_eq!(ns.columns.header(SemanticField::Team), Some("Franchise".to_string()));
        assert_eq!(
            ns.percent_source,
            PercentSource::Derived { total_score: 3, total: 4 }
        );
        assert_eq!(
            ns.parameters,
            vec![ScoringParameter::Introduction, ScoringParameter::Softskill]
        );

        let r0 = &ns.records[0];
        assert_eq!(r0.team.as_deref(), Some("North"));
        assert_eq!(r0.rm_name.as_deref(), Some("Asha"));
        assert_eq!(r0.call_minutes, Some(5.5));
        assert_eq!(r0.percent_score, Some(85.0));
        assert_eq!(r0.parameter(ScoringParameter::Introduction), Some(80.0));
        assert_eq!(r0.parameter(ScoringParameter::Softskill), None);
        assert_eq!(r0.raw("Call Duration"), Some(&Cell::from("00:05:30")));
        assert_eq!(r0.raw_columns.len(), 7);
        assert_eq!(r0.raw_columns[0].0, "Franchise");

        let r1 = &ns.records[1];
        assert_eq!(r1.team, None);
        assert_eq!(r1.rm_name, None);
        assert_eq!(r1.call_minutes, None);
        assert_eq!(r1.percent_score, None);
        assert_eq!(r1.parameter(ScoringParameter::Introduction), None);
    }

    #[test]
    fn no_matching_columns() {
        let mut b = SheetBuilder::new(&["Something"]);
        b.add_row(vec!["x".into()]).unwrap();
        let ns = normalize_sheet(&b.build());
        assert_eq!(ns.columns, ColumnMap::default());
        assert_eq!(ns.percent_source, PercentSource::Unavailable);
        assert!(ns.parameters.is_empty());
        let r = &ns.records[0];
        assert_eq!((r.team.clone(), r.rm_name.clone()), (None, None));
        assert_eq!((r.percent_score, r.call_minutes), (None, None));
        assert!(r.parameters.is_empty());
    }
}
