//! CSV reader for spreadsheets exported as comma-separated text.

use std::io::Read;
use std::path::Path;

use crate::LoadError;
use crate::table::{RawTable, unnamed_header};

/// Reads a CSV file from disk.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or parsed.
pub fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path)?;
    read_csv_from(file, &path.display().to_string())
}

/// Reads CSV text from any reader. The first record is the header row.
///
/// Rows may have fewer or more fields than the header; cells are kept as
/// written except that empty fields become `None`.
///
/// # Errors
///
/// Returns [`LoadError`] if the CSV is malformed or has no header row.
pub fn read_csv_from<R: Read>(reader: R, source_name: &str) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if h.is_empty() {
                unnamed_header(idx)
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.is_empty() {
        return Err(LoadError::MissingHeader {
            source_name: source_name.to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    log::debug!("Parsed {} rows from CSV {source_name}", rows.len());

    Ok(RawTable { headers, rows })
}
