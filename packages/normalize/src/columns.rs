//! Column header cleanup and canonical renaming.
//!
//! Spreadsheet exports carry form-question text as headers, often with
//! stray newlines, non-breaking spaces and trailing blanks. Headers are
//! cleaned, then looked up in a [`ColumnMapping`] loaded from TOML. The
//! default mapping is embedded at compile time; an override file with the
//! same shape can replace it.

use std::collections::BTreeMap;
use std::path::Path;

use incident_dashboard_incident_models::CanonicalColumn;
use serde::Deserialize;

use crate::MappingError;

/// Default mapping, embedded at compile time.
const DEFAULT_MAPPING_TOML: &str = include_str!("../columns/default.toml");

/// Trims a raw header and replaces line breaks and non-breaking spaces with
/// ordinary spaces. A `\r\n` pair counts as one break.
#[must_use]
pub fn clean_header(raw: &str) -> String {
    raw.trim()
        .replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\u{a0}' => ' ',
            other => other,
        })
        .collect()
}

/// Lookup key for a header: cleaned, with every whitespace run collapsed to
/// one space. Only used for matching, never as an output name.
fn header_key(raw: &str) -> String {
    clean_header(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A single `raw -> canonical` entry in the mapping file.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnEntry {
    /// Header text as it appears in the source spreadsheet.
    pub raw: String,
    /// Canonical column the header is renamed to.
    pub canonical: CanonicalColumn,
}

#[derive(Debug, Deserialize)]
struct MappingFile {
    columns: Vec<ColumnEntry>,
}

/// Lookup table from raw header text to canonical column.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    by_key: BTreeMap<String, CanonicalColumn>,
}

/// A header after cleanup and lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeader {
    /// Output name: the canonical name when mapped, otherwise the cleaned
    /// raw header.
    pub name: String,
    /// Canonical column this header feeds, if any.
    pub canonical: Option<CanonicalColumn>,
}

impl ColumnMapping {
    /// Returns the embedded default mapping.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a compile-time guarantee
    /// covered by tests).
    #[must_use]
    pub fn default_mapping() -> Self {
        Self::from_toml_str(DEFAULT_MAPPING_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded column mapping: {e}"))
    }

    /// Parses a mapping from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the TOML is malformed, names an unknown
    /// canonical column, or maps the same raw header twice.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, MappingError> {
        let file: MappingFile = toml::de::from_str(toml_str)?;
        Self::from_entries(file.columns)
    }

    /// Reads a mapping override file.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, MappingError> {
        let contents = std::fs::read_to_string(path)?;
        let mapping = Self::from_toml_str(&contents)?;
        log::info!(
            "Loaded {} column mappings from {}",
            mapping.len(),
            path.display()
        );
        Ok(mapping)
    }

    /// Builds a mapping from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::DuplicateRaw`] if two entries share the same
    /// cleaned raw header.
    pub fn from_entries(
        entries: impl IntoIterator<Item = ColumnEntry>,
    ) -> Result<Self, MappingError> {
        let mut by_key = BTreeMap::new();
        for entry in entries {
            let key = header_key(&entry.raw);
            if by_key.insert(key.clone(), entry.canonical).is_some() {
                return Err(MappingError::DuplicateRaw { raw: key });
            }
        }
        Ok(Self { by_key })
    }

    /// Number of raw headers in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Resolves a single raw header.
    ///
    /// A header that is already a canonical name (e.g. a file exported after
    /// renaming) resolves to that column even without a table entry.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> NormalizedHeader {
        let cleaned = clean_header(raw);
        let canonical = self
            .by_key
            .get(&header_key(&cleaned))
            .copied()
            .or_else(|| cleaned.parse::<CanonicalColumn>().ok());

        canonical.map_or(
            NormalizedHeader {
                name: cleaned,
                canonical: None,
            },
            |column| NormalizedHeader {
                name: column.to_string(),
                canonical: Some(column),
            },
        )
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::default_mapping()
    }
}

/// Cleans and renames every header. The output has the same length and
/// order as the input; nothing is dropped.
#[must_use]
pub fn normalize_headers<S: AsRef<str>>(
    raw_headers: &[S],
    mapping: &ColumnMapping,
) -> Vec<NormalizedHeader> {
    raw_headers
        .iter()
        .map(|raw| mapping.resolve(raw.as_ref()))
        .collect()
}
