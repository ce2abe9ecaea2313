//! Workbook reader backed by `calamine`.
//!
//! Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` file. The first
//! row is the header row; every other cell is rendered to text so the
//! normalizer sees the same kind of input it would get from a CSV export.

use std::path::Path;

use calamine::{Data, Range, Reader as _, open_workbook_auto};

use crate::LoadError;
use crate::table::{RawTable, unnamed_header};

/// Layout for spreadsheet-native date/time cells carrying a calendar date.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout for time-only cells (serial value below one day).
const TIME_FORMAT: &str = "%H:%M:%S";

/// Reads the first worksheet of a workbook.
///
/// # Errors
///
/// Returns [`LoadError`] if the workbook cannot be opened, has no sheets,
/// or the first sheet has no header row.
pub fn read_spreadsheet(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::MissingHeader {
            source_name: path.display().to_string(),
        })?;

    log::debug!("Reading sheet '{sheet_name}' from {}", path.display());

    let range = workbook.worksheet_range(&sheet_name)?;
    table_from_range(&range, &sheet_name)
}

/// Converts a worksheet range into a [`RawTable`].
///
/// # Errors
///
/// Returns [`LoadError::MissingHeader`] if the range is empty.
pub fn table_from_range(range: &Range<Data>, sheet_name: &str) -> Result<RawTable, LoadError> {
    let mut rows = range.rows();

    let header_row = rows.next().ok_or_else(|| LoadError::MissingHeader {
        source_name: sheet_name.to_string(),
    })?;

    let headers = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| cell_to_string(cell).unwrap_or_else(|| unnamed_header(idx)))
        .collect();

    let rows = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

/// Renders a cell to text. Empty and error cells are `None`.
#[must_use]
pub fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(n) => Some(n.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => {
            let format = if dt.as_f64() < 1.0 {
                TIME_FORMAT
            } else {
                DATETIME_FORMAT
            };
            dt.as_datetime()
                .map(|value| value.format(format).to_string())
                .or_else(|| Some(format_float(dt.as_f64())))
        }
    }
}

/// Whole-valued floats print without a fractional part (`3.0` -> `3`).
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_plain_cells() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String(String::new())), None);
        assert_eq!(
            cell_to_string(&Data::String("2:15pm".to_string())).as_deref(),
            Some("2:15pm")
        );
        assert_eq!(cell_to_string(&Data::Int(42)).as_deref(), Some("42"));
        assert_eq!(cell_to_string(&Data::Float(3.0)).as_deref(), Some("3"));
        assert_eq!(cell_to_string(&Data::Float(2.5)).as_deref(), Some("2.5"));
    }

    #[test]
    fn builds_table_from_range() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("Date".to_string()));
        range.set_value((0, 1), Data::String("Time (AM or PM)".to_string()));
        range.set_value((1, 0), Data::String("2024-01-15".to_string()));
        range.set_value((1, 1), Data::String("2:15pm".to_string()));
        range.set_value((1, 2), Data::String("Theft".to_string()));
        range.set_value((2, 1), Data::Float(14.0));

        let table = table_from_range(&range, "Sheet1").unwrap();
        assert_eq!(table.headers, ["Date", "Time (AM or PM)", "Unnamed: 2"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][2].as_deref(), Some("Theft"));
        assert_eq!(table.rows[1], [None, Some("14".to_string()), None]);
    }

    #[test]
    fn empty_range_has_no_header() {
        let range: Range<Data> = Range::empty();
        assert!(matches!(
            table_from_range(&range, "Sheet1"),
            Err(LoadError::MissingHeader { .. })
        ));
    }
}
