use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;

use crate::audit::*;

const SECONDS_PER_DAY: f64 = 86_400.0;
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads one worksheet of a workbook (.xlsx, .xls or .xlsm) into a [Sheet].
///
/// The first row is the header. Rows where every cell is blank are dropped.
pub fn read_sheet(path: &str, worksheet: Option<&str>) -> AuditResult<Sheet> {
    debug!("read_sheet: path: {:?} worksheet: {:?}", path, worksheet);
    let wrange = get_range(path, worksheet)?;

    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(header_name)
        .collect();
    debug!("read_sheet: header: {:?}", header);

    let mut data: Vec<Vec<Cell>> = Vec::new();
    for (idx, row) in rows.enumerate() {
        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        if cells.iter().all(|c| c.is_blank()) {
            debug!("read_sheet: skipping blank row {}", idx + 2);
            continue;
        }
        data.push(cells);
    }
    info!(
        "Read {} rows and {} columns from {}",
        data.len(),
        header.len(),
        io_common::simplify_file_name(path)
    );
    Ok(Sheet::new(header, data))
}

fn get_range(path: &str, worksheet: Option<&str>) -> AuditResult<Range<Data>> {
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet {
        let names = workbook.sheet_names();
        ensure!(
            names.iter().any(|n| n == name),
            MissingWorksheetSnafu { path, name }
        );
        workbook
            .worksheet_range(name)
            .context(OpeningExcelSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}

fn header_name(cell: &Data) -> String {
    convert_cell(cell).as_text().unwrap_or_default()
}

/// Converts a calamine cell. Cells with a time or duration number format come
/// back as `H:MM:SS` text, so that call durations stored as Excel times are
/// read in minutes.
pub fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::from(Some(*f).filter(|x| x.is_finite())),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => convert_date_time(dt.as_f64(), dt.is_duration(), dt.as_datetime()),
        _ => Cell::Empty,
    }
}

// Durations and times of day give `H:MM:SS` (hours may go past 24). Calendar
// dates are kept as text and are never read as a number of minutes.
fn convert_date_time(value: f64, is_duration: bool, datetime: Option<NaiveDateTime>) -> Cell {
    if !value.is_finite() || value < 0.0 {
        Cell::Empty
    } else if is_duration || value < 1.0 {
        Cell::Text(format_time_of_day(value))
    } else {
        match datetime {
            Some(d) => Cell::Text(d.format(DATE_TIME_FORMAT).to_string()),
            None => Cell::Empty,
        }
    }
}

fn format_time_of_day(day_fraction: f64) -> String {
    let total = (day_fraction * SECONDS_PER_DAY).round() as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_stats::duration::normalize_duration;
    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::TempDir;

    fn save(workbook: &mut Workbook, dir: &TempDir) -> String {
        let path = dir.path().join("audit.xlsx");
        workbook.save(&path).unwrap();
        path.display().to_string()
    }

    #[test]
    fn cells() {
        assert_eq!(
            convert_cell(&Data::String("North".to_string())),
            Cell::Text("North".to_string())
        );
        assert_eq!(convert_cell(&Data::String("".to_string())), Cell::Empty);
        assert_eq!(convert_cell(&Data::Float(72.5)), Cell::Number(72.5));
        assert_eq!(convert_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn date_time_values() {
        // 0:05:30
        let cell = convert_date_time(330.0 / SECONDS_PER_DAY, false, None);
        assert_eq!(cell, Cell::Text("0:05:30".to_string()));
        assert_eq!(normalize_duration(&cell), Some(5.5));

        let long_call = convert_date_time(25.5 / 24.0, true, None);
        assert_eq!(long_call, Cell::Text("25:30:00".to_string()));
        assert_eq!(normalize_duration(&long_call), Some(1530.0));

        let date = chrono::NaiveDate::from_ymd_opt(2023, 3, 15)
            .and_then(|d| d.and_hms_opt(6, 0, 0));
        let cell = convert_date_time(45000.25, false, date);
        assert_eq!(cell, Cell::Text("2023-03-15 06:00:00".to_string()));
        assert_eq!(normalize_duration(&cell), None);
        assert_eq!(convert_date_time(45000.25, false, None), Cell::Empty);
    }

    #[test]
    fn headers() {
        let h = Data::String(" Call Duration ".to_string());
        assert_eq!(header_name(&h), " Call Duration ");
        assert_eq!(header_name(&Data::Int(2024)), "2024");
        assert_eq!(header_name(&Data::Empty), "");
    }

    #[test]
    fn time_formatted_durations() {
        let dir = TempDir::new().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Call Duration").unwrap();
        sheet.write_string(0, 1, "Date").unwrap();
        let formats = ["hh:mm:ss", "h:mm:ss", "mm:ss", "[h]:mm:ss"];
        for (i, f) in formats.iter().enumerate() {
            let minutes = (i + 1) as f64;
            let format = Format::new().set_num_format(*f);
            sheet
                .write_number_with_format((i + 1) as u32, 0, minutes / 1440.0, &format)
                .unwrap();
        }
        let long = Format::new().set_num_format("[h]:mm:ss");
        sheet.write_number_with_format(5, 0, 25.0 / 24.0, &long).unwrap();
        let date = Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_number_with_format(6, 0, 45000.0, &date).unwrap();
        let path = save(&mut workbook, &dir);

        let s = read_sheet(&path, None).unwrap();
        let minutes: Vec<Option<f64>> = s.rows.iter().map(|r| normalize_duration(&r[0])).collect();
        assert_eq!(
            minutes,
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(1500.0), None]
        );
    }

    #[test]
    fn worksheet_by_name() {
        let dir = TempDir::new().unwrap();
        let mut workbook = Workbook::new();
        let summary = workbook.add_worksheet();
        summary.set_name("Summary").unwrap();
        summary.write_string(0, 0, "Notes").unwrap();
        let audits = workbook.add_worksheet();
        audits.set_name("Audits").unwrap();
        audits.write_string(0, 0, "Team").unwrap();
        audits.write_string(1, 0, "North").unwrap();
        let path = save(&mut workbook, &dir);

        let first = read_sheet(&path, None).unwrap();
        assert_eq!(first.header, vec!["Notes".to_string()]);

        let named = read_sheet(&path, Some("Audits")).unwrap();
        assert_eq!(named.header, vec!["Team".to_string()]);
        assert_eq!(named.rows, vec![vec![Cell::Text("North".to_string())]]);

        let res = read_sheet(&path, Some("Sheet9"));
        assert!(matches!(res, Err(AuditError::MissingWorksheet { .. })));
    }

    #[test]
    fn empty_worksheet() {
        let dir = TempDir::new().unwrap();
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let path = save(&mut workbook, &dir);

        let res = read_sheet(&path, None);
        assert!(matches!(res, Err(AuditError::EmptyExcel { .. })));
    }

    #[test]
    fn blank_rows_are_dropped() {
        let dir = TempDir::new().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Team").unwrap();
        sheet.write_string(0, 1, "%age").unwrap();
        sheet.write_string(1, 0, "North").unwrap();
        sheet.write_number(1, 1, 80.0).unwrap();
        // Rows 2 and 3 are left empty.
        sheet.write_string(4, 0, "South").unwrap();
        sheet.write_number(4, 1, 70.0).unwrap();
        let path = save(&mut workbook, &dir);

        let s = read_sheet(&path, None).unwrap();
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.rows[0][0], Cell::Text("North".to_string()));
        assert_eq!(s.rows[1][1], Cell::Number(70.0));
    }

    #[test]
    fn missing_file() {
        let res = read_sheet("/nonexistent/audit.xlsx", None);
        assert!(matches!(res, Err(AuditError::OpeningExcel { .. })));
    }
}
