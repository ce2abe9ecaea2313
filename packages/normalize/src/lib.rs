#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Header, time and date normalization for incident report spreadsheets.
//!
//! Raw headers are cleaned and renamed to canonical columns once, free-form
//! times are standardized to `HH:MM:SS` (or `Unknown`), and the derived
//! hour, time-range and weekday fields are computed in a single pass per
//! row. Nothing in here returns an error for bad cell data: unparseable
//! values degrade to their fallback.

pub mod columns;
pub mod dates;
pub mod derive;
pub mod time;

/// Errors that can occur while loading a column mapping.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// I/O error reading a mapping override file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping TOML is malformed or names an unknown canonical column.
    #[error("Invalid column mapping: {0}")]
    Toml(#[from] toml::de::Error),

    /// Two entries resolve to the same cleaned raw header.
    #[error("Duplicate column mapping for raw header '{raw}'")]
    DuplicateRaw {
        /// The cleaned raw header that appeared twice.
        raw: String,
    },
}
