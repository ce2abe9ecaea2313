#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter selection and aggregation result types for the dashboard.
//!
//! Every result is a list of `label -> number` pairs in display order, ready
//! to be handed to a chart without further reshaping.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Selection value meaning "no filter".
pub const ALL_SELECTION: &str = "All";

/// The single interactive input: which incident type to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum IncidentTypeFilter {
    /// Every record.
    #[default]
    All,
    /// Only records whose incident type equals this value exactly.
    Exact(String),
}

impl IncidentTypeFilter {
    /// Interprets a raw selection. The sentinel `All` disables filtering;
    /// anything else is an exact, case-sensitive incident type.
    #[must_use]
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_SELECTION {
            Self::All
        } else {
            Self::Exact(selection.to_string())
        }
    }

    /// The selection value as sent by the client.
    #[must_use]
    pub fn as_selection(&self) -> &str {
        match self {
            Self::All => ALL_SELECTION,
            Self::Exact(value) => value,
        }
    }
}

impl std::fmt::Display for IncidentTypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_selection())
    }
}

impl Serialize for IncidentTypeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_selection())
    }
}

impl<'de> Deserialize<'de> for IncidentTypeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_selection(&s))
    }
}

/// Number of incidents under one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    /// Category label.
    pub label: String,
    /// Number of incidents.
    pub count: u64,
}

/// Number of incidents starting in one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    /// Hour 0-23, or -1 for incidents with no valid time.
    pub hour: i32,
    /// Number of incidents.
    pub count: u64,
}

/// Weekday counts in the caller's ordering, plus the records whose date
/// could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekCounts {
    /// One entry per requested weekday, zero-filled.
    pub days: Vec<LabelCount>,
    /// Records with no weekday.
    pub unparsed: u64,
}

/// One slice of the type-proportion view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProportionSlice {
    /// Incident type exactly as reported.
    pub label: String,
    /// Number of incidents of this type.
    pub count: u64,
    /// Share of all typed incidents, 0.0-1.0.
    pub fraction: f64,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The selection these results were computed for.
    pub selection: IncidentTypeFilter,
    /// Number of records matching the selection.
    pub total_count: u64,
    /// Counts by incident type with parenthetical qualifiers removed.
    pub by_type: Vec<LabelCount>,
    /// Counts by hour, ascending, including -1.
    pub by_hour: Vec<HourCount>,
    /// Counts by time-range bucket in fixed bucket order.
    pub by_time_range: Vec<LabelCount>,
    /// Counts by weekday, Monday first.
    pub by_day_of_week: DayOfWeekCounts,
    /// Dataset-wide proportions by raw incident type. Not affected by the
    /// selection.
    pub type_proportions: Vec<ProportionSlice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_disables_filtering() {
        assert_eq!(
            IncidentTypeFilter::from_selection("All"),
            IncidentTypeFilter::All
        );
        assert_eq!(
            IncidentTypeFilter::from_selection("all"),
            IncidentTypeFilter::Exact("all".to_string())
        );
    }

    #[test]
    fn filter_serializes_as_selection_string() {
        let filter = IncidentTypeFilter::Exact("Theft (minor)".to_string());
        assert_eq!(
            serde_json::to_string(&filter).unwrap(),
            "\"Theft (minor)\""
        );
        let back: IncidentTypeFilter = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(back, IncidentTypeFilter::All);
    }
}
