//! In-memory table read from a source file, before any normalization.

/// A header row plus data rows of optional string cells.
///
/// Empty cells are `None`; every other cell is kept as text exactly as the
/// reader produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header cells in source order.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than `headers`.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header text for an empty header cell at `idx`, so the column is kept.
#[must_use]
pub fn unnamed_header(idx: usize) -> String {
    format!("Unnamed: {idx}")
}
