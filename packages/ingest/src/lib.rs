#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads an incident report spreadsheet into an immutable
//! [`IncidentDataset`].
//!
//! The file is read into a [`RawTable`] (header row plus string cells),
//! headers are normalized once, required canonical columns are checked,
//! and every row is derived into an `IncidentRecord`. The load either
//! succeeds for every row or fails as a whole.

pub mod csv_file;
pub mod spreadsheet;
pub mod table;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use incident_dashboard_incident_models::{CanonicalColumn, IncidentDataset};
use incident_dashboard_normalize::MappingError;
use incident_dashboard_normalize::columns::{
    ColumnMapping, NormalizedHeader, clean_header, normalize_headers,
};
use incident_dashboard_normalize::derive::{RawIncident, derive_record};

pub use table::RawTable;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The CSV file could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The column mapping override could not be loaded.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The file extension is not a supported spreadsheet format.
    #[error("Unsupported file format for {}: expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv", .path.display())]
    UnsupportedFormat {
        /// The rejected path.
        path: PathBuf,
    },

    /// The source has no header row.
    #[error("No header row found in {source_name}")]
    MissingHeader {
        /// File or sheet the table was read from.
        source_name: String,
    },

    /// Required canonical columns are absent after header normalization.
    #[error(
        "Missing required column(s) {}; headers after normalization: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        /// Canonical names that could not be found.
        missing: Vec<String>,
        /// Normalized header names that were present.
        found: Vec<String>,
    },
}

/// Supported input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Excel or `OpenDocument` workbook, read with `calamine`.
    Spreadsheet,
    /// Comma-separated text.
    Csv,
}

impl SourceFormat {
    /// Picks the format from a path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Reads the raw table from a file without normalizing anything.
///
/// # Errors
///
/// Returns [`LoadError`] if the format is unsupported or the file cannot be
/// read.
pub fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Spreadsheet) => spreadsheet::read_spreadsheet(path),
        Some(SourceFormat::Csv) => csv_file::read_csv(path),
        None => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Loads and normalizes a dataset from a file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or a required column is
/// missing.
pub fn load_dataset(path: &Path, mapping: &ColumnMapping) -> Result<IncidentDataset, LoadError> {
    let start = Instant::now();
    log::info!("Loading incidents from {}", path.display());

    let table = read_table(path)?;
    let dataset = build_dataset(&table, mapping)?;

    log::info!(
        "Loaded {} incidents ({} incident types) from {} in {:.2}s",
        dataset.len(),
        dataset.incident_types().len(),
        path.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(dataset)
}

/// Loads the column mapping override at `path`, or the embedded default.
///
/// # Errors
///
/// Returns [`LoadError::Mapping`] if the override cannot be read or parsed.
pub fn load_mapping(path: Option<&Path>) -> Result<ColumnMapping, LoadError> {
    Ok(match path {
        Some(path) => ColumnMapping::from_path(path)?,
        None => ColumnMapping::default_mapping(),
    })
}

/// Returns the required canonical columns missing from normalized headers.
#[must_use]
pub fn missing_required_columns(headers: &[NormalizedHeader]) -> Vec<CanonicalColumn> {
    CanonicalColumn::required()
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h.canonical == Some(*column)))
        .collect()
}

/// Where each header's values go in a [`RawIncident`].
enum Slot {
    Canonical(CanonicalColumn),
    Extra(String),
}

/// Resolves every normalized header to a destination slot. A canonical
/// column that appears twice keeps its first occurrence; later copies are
/// kept as extras under their cleaned raw header. Extra names are made
/// unique with a `.1`, `.2`, ... suffix so no column overwrites another.
fn assign_slots(raw_headers: &[String], headers: &[NormalizedHeader]) -> Vec<Slot> {
    let mut seen: BTreeMap<CanonicalColumn, usize> = BTreeMap::new();
    let mut taken: BTreeSet<String> = BTreeSet::new();

    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let name = match header.canonical {
                Some(column) => {
                    let Some(first) = seen.get(&column).copied() else {
                        seen.insert(column, idx);
                        return Slot::Canonical(column);
                    };
                    let fallback = clean_header(&raw_headers[idx]);
                    log::warn!(
                        "Column {} appears again at position {} (first at {}); keeping it as '{fallback}'",
                        column,
                        idx + 1,
                        first + 1
                    );
                    fallback
                }
                None => header.name.clone(),
            };
            let name = if name.is_empty() {
                table::unnamed_header(idx)
            } else {
                name
            };
            Slot::Extra(unique_name(name, &mut taken))
        })
        .collect()
}

/// Returns `name`, or the first free `name.N`, and marks it taken.
fn unique_name(name: String, taken: &mut BTreeSet<String>) -> String {
    let mut candidate = name.clone();
    let mut suffix = 1;
    while taken.contains(&candidate) {
        candidate = format!("{name}.{suffix}");
        suffix += 1;
    }
    if candidate != name {
        log::debug!("Extra column '{name}' renamed to '{candidate}'");
    }
    taken.insert(candidate.clone());
    candidate
}

fn set_canonical(raw: &mut RawIncident, column: CanonicalColumn, value: Option<String>) {
    let field = match column {
        CanonicalColumn::Date => &mut raw.date,
        CanonicalColumn::IncidentTime => &mut raw.incident_time,
        CanonicalColumn::IncidentType => &mut raw.incident_type,
        CanonicalColumn::Patron1Name => &mut raw.patron_1_name,
        CanonicalColumn::Patron1Email => &mut raw.patron_1_email,
        CanonicalColumn::Patron2Name => &mut raw.patron_2_name,
        CanonicalColumn::Patron2Email => &mut raw.patron_2_email,
        CanonicalColumn::AdditionalContacts => &mut raw.additional_contacts,
        CanonicalColumn::Description => &mut raw.description,
        CanonicalColumn::ActionTaken => &mut raw.action_taken,
        CanonicalColumn::FormEmployee => &mut raw.form_employee,
    };
    *field = value;
}

/// Normalizes headers, validates required columns and derives every row.
///
/// Rows whose cells are all empty are skipped.
///
/// # Errors
///
/// Returns [`LoadError::MissingColumns`] if any required canonical column
/// is absent after header normalization.
pub fn build_dataset(
    table: &RawTable,
    mapping: &ColumnMapping,
) -> Result<IncidentDataset, LoadError> {
    let headers = normalize_headers(&table.headers, mapping);

    let missing = missing_required_columns(&headers);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            missing: missing.iter().map(ToString::to_string).collect(),
            found: headers.into_iter().map(|h| h.name).collect(),
        });
    }

    let slots = assign_slots(&table.headers, &headers);
    let mut skipped = 0_usize;

    let records = table
        .rows
        .iter()
        .filter(|row| {
            let blank = row.iter().all(Option::is_none);
            if blank {
                skipped += 1;
            }
            !blank
        })
        .map(|row| {
            let mut raw = RawIncident::default();
            for (idx, slot) in slots.iter().enumerate() {
                let value = row.get(idx).cloned().flatten();
                match slot {
                    Slot::Canonical(column) => set_canonical(&mut raw, *column, value),
                    Slot::Extra(name) => {
                        if let Some(value) = value {
                            raw.extra.insert(name.clone(), value);
                        }
                    }
                }
            }
            derive_record(raw)
        })
        .collect();

    if skipped > 0 {
        log::debug!("Skipped {skipped} blank row(s)");
    }

    Ok(IncidentDataset::new(records))
}
