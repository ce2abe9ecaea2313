#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized incident record types and derived bucket definitions.
//!
//! This crate defines the canonical record shape produced by the
//! normalization pipeline. Every stage after header normalization works with
//! these typed fields and never looks a value up by its raw column name.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Literal used wherever a time-derived value could not be determined.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Sentinel hour meaning "no valid hour could be derived".
pub const UNKNOWN_HOUR: i32 = -1;

/// Canonical column names used after header normalization.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CanonicalColumn {
    /// Calendar date of the incident.
    #[serde(rename = "Date")]
    #[strum(serialize = "Date")]
    Date,
    /// Free-form time the incident happened.
    #[serde(rename = "Incident Time")]
    #[strum(serialize = "Incident Time")]
    IncidentTime,
    /// Incident type, possibly with a parenthetical qualifier.
    #[serde(rename = "Incident Type")]
    #[strum(serialize = "Incident Type")]
    IncidentType,
    /// Legal name of the first patron involved.
    #[serde(rename = "Patron 1 Name")]
    #[strum(serialize = "Patron 1 Name")]
    Patron1Name,
    /// Email address of the first patron.
    #[serde(rename = "Patron 1 Email")]
    #[strum(serialize = "Patron 1 Email")]
    Patron1Email,
    /// Legal name of the second patron involved.
    #[serde(rename = "Patron 2 Name")]
    #[strum(serialize = "Patron 2 Name")]
    Patron2Name,
    /// Email address of the second patron.
    #[serde(rename = "Patron 2 Email")]
    #[strum(serialize = "Patron 2 Email")]
    Patron2Email,
    /// Additional patrons, witnesses and their contact information.
    #[serde(rename = "Additional Contacts")]
    #[strum(serialize = "Additional Contacts")]
    AdditionalContacts,
    /// Detailed narrative of the incident.
    #[serde(rename = "Description")]
    #[strum(serialize = "Description")]
    Description,
    /// What staff did in response.
    #[serde(rename = "Action Taken")]
    #[strum(serialize = "Action Taken")]
    ActionTaken,
    /// Employee who filled in the report.
    #[serde(rename = "Form Employee")]
    #[strum(serialize = "Form Employee")]
    FormEmployee,
}

impl CanonicalColumn {
    /// Columns the derivation pipeline cannot run without.
    #[must_use]
    pub const fn required() -> &'static [Self] {
        &[Self::Date, Self::IncidentTime, Self::IncidentType]
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Date,
            Self::IncidentTime,
            Self::IncidentType,
            Self::Patron1Name,
            Self::Patron1Email,
            Self::Patron2Name,
            Self::Patron2Email,
            Self::AdditionalContacts,
            Self::Description,
            Self::ActionTaken,
            Self::FormEmployee,
        ]
    }
}

/// A time of day in canonical `HH:MM:SS` form, or `Unknown`.
///
/// Serializes as the plain string so consumers see exactly the canonical
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StandardizedTime {
    /// Successfully parsed time.
    Known(NaiveTime),
    /// The raw value was missing, ambiguous, or unparseable.
    #[default]
    Unknown,
}

impl StandardizedTime {
    /// Canonical output format.
    pub const FORMAT: &'static str = "%H:%M:%S";

    /// Returns the hour component, or [`UNKNOWN_HOUR`].
    #[must_use]
    pub fn hour(self) -> i32 {
        match self {
            #[allow(clippy::cast_possible_wrap)]
            Self::Known(time) => time.hour() as i32,
            Self::Unknown => UNKNOWN_HOUR,
        }
    }

    /// Returns `true` when a concrete time is present.
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl std::fmt::Display for StandardizedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(time) => write!(f, "{}", time.format(Self::FORMAT)),
            Self::Unknown => f.write_str(UNKNOWN_LABEL),
        }
    }
}

/// Error returned when a string is neither `HH:MM:SS` nor `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStandardizedTimeError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidStandardizedTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid standardized time '{}': expected HH:MM:SS or {UNKNOWN_LABEL}",
            self.value
        )
    }
}

impl std::error::Error for InvalidStandardizedTimeError {}

impl FromStr for StandardizedTime {
    type Err = InvalidStandardizedTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNKNOWN_LABEL {
            return Ok(Self::Unknown);
        }
        NaiveTime::parse_from_str(s, Self::FORMAT)
            .map(Self::Known)
            .map_err(|_| InvalidStandardizedTimeError {
                value: s.to_string(),
            })
    }
}

impl Serialize for StandardizedTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StandardizedTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed time-of-day windows used for histogram-style aggregation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Default,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimeRange {
    /// Midnight up to 6am.
    #[serde(rename = "12am-6am")]
    #[strum(serialize = "12am-6am")]
    EarlyMorning,
    /// 6am up to 9am.
    #[serde(rename = "6am-9am")]
    #[strum(serialize = "6am-9am")]
    Morning,
    /// 9am up to noon.
    #[serde(rename = "9am-12pm")]
    #[strum(serialize = "9am-12pm")]
    LateMorning,
    /// Noon up to 3pm.
    #[serde(rename = "12pm-3pm")]
    #[strum(serialize = "12pm-3pm")]
    Afternoon,
    /// 3pm up to 6pm.
    #[serde(rename = "3pm-6pm")]
    #[strum(serialize = "3pm-6pm")]
    LateAfternoon,
    /// 6pm up to 9pm.
    #[serde(rename = "6pm-9pm")]
    #[strum(serialize = "6pm-9pm")]
    Evening,
    /// 9pm up to midnight.
    #[serde(rename = "9pm-12am")]
    #[strum(serialize = "9pm-12am")]
    Night,
    /// No valid hour.
    #[default]
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl TimeRange {
    /// Buckets an hour. Total over every `i32`: negatives are `Unknown` and
    /// anything from 21 upward lands in the last window.
    #[must_use]
    pub const fn from_hour(hour: i32) -> Self {
        match hour {
            i32::MIN..=-1 => Self::Unknown,
            0..=5 => Self::EarlyMorning,
            6..=8 => Self::Morning,
            9..=11 => Self::LateMorning,
            12..=14 => Self::Afternoon,
            15..=17 => Self::LateAfternoon,
            18..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Chart order: the seven windows through the day, then `Unknown`.
    #[must_use]
    pub const fn ordered() -> &'static [Self] {
        &[
            Self::EarlyMorning,
            Self::Morning,
            Self::LateMorning,
            Self::Afternoon,
            Self::LateAfternoon,
            Self::Evening,
            Self::Night,
            Self::Unknown,
        ]
    }
}

/// English weekday, named in full.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// Monday-first week, the default chart ordering.
    pub const MONDAY_FIRST: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// One incident report after normalization and derivation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Calendar date, `None` when missing or unparseable.
    pub date: Option<NaiveDate>,
    /// Time exactly as reported.
    pub incident_time_raw: Option<String>,
    /// Canonical `HH:MM:SS` time or `Unknown`.
    pub standardized_time: StandardizedTime,
    /// Hour 0-23 or [`UNKNOWN_HOUR`].
    pub incident_hour: i32,
    /// Bucket derived from `incident_hour`.
    pub time_range: TimeRange,
    /// Weekday derived from `date`; absent when `date` is absent.
    pub day_of_week: Option<DayOfWeek>,
    /// Incident type as reported.
    pub incident_type: Option<String>,
    /// Legal name of the first patron involved.
    pub patron_1_name: Option<String>,
    /// Email address of the first patron.
    pub patron_1_email: Option<String>,
    /// Legal name of the second patron involved.
    pub patron_2_name: Option<String>,
    /// Email address of the second patron.
    pub patron_2_email: Option<String>,
    /// Other patrons or witnesses and how to reach them.
    pub additional_contacts: Option<String>,
    /// Narrative of what happened.
    pub description: Option<String>,
    /// What staff did in response.
    pub action_taken: Option<String>,
    /// Employee who completed the report.
    pub form_employee: Option<String>,
    /// Columns with no canonical name, keyed by cleaned header. Repeated
    /// names get a `.1`, `.2`, ... suffix.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// The full set of normalized records loaded from one source file.
///
/// Built once and never mutated. The distinct incident types are captured
/// at construction and serve as the allowed filter values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDataset {
    records: Vec<IncidentRecord>,
    incident_types: Vec<String>,
}

impl IncidentDataset {
    /// Wraps records, collecting the sorted distinct non-null incident types.
    #[must_use]
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        let mut incident_types: Vec<String> = records
            .iter()
            .filter_map(|r| r.incident_type.clone())
            .collect();
        incident_types.sort_unstable();
        incident_types.dedup();

        Self {
            records,
            incident_types,
        }
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Sorted distinct incident types observed at load.
    #[must_use]
    pub fn incident_types(&self) -> &[String] {
        &self.incident_types
    }

    /// Returns `true` if `incident_type` was observed in this dataset.
    #[must_use]
    pub fn has_incident_type(&self, incident_type: &str) -> bool {
        self.incident_types
            .binary_search_by(|t| t.as_str().cmp(incident_type))
            .is_ok()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_is_total_over_system_hours() {
        for hour in -1..=23 {
            let range = TimeRange::from_hour(hour);
            assert!(
                TimeRange::ordered().contains(&range),
                "hour {hour} mapped outside the ordered buckets"
            );
        }
        assert_eq!(TimeRange::from_hour(i32::MIN), TimeRange::Unknown);
        assert_eq!(TimeRange::from_hour(i32::MAX), TimeRange::Night);
    }

    #[test]
    fn time_range_boundaries() {
        let cases = [
            (-1, "Unknown"),
            (0, "12am-6am"),
            (5, "12am-6am"),
            (6, "6am-9am"),
            (9, "9am-12pm"),
            (12, "12pm-3pm"),
            (14, "12pm-3pm"),
            (15, "3pm-6pm"),
            (18, "6pm-9pm"),
            (21, "9pm-12am"),
            (23, "9pm-12am"),
        ];
        for (hour, label) in cases {
            assert_eq!(TimeRange::from_hour(hour).to_string(), label, "hour {hour}");
        }
    }

    #[test]
    fn time_range_labels_parse_back() {
        for range in TimeRange::ordered() {
            assert_eq!(range.to_string().parse::<TimeRange>().unwrap(), *range);
        }
    }

    #[test]
    fn standardized_time_serializes_as_string() {
        let known = StandardizedTime::Known(NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"14:30:00\"");
        assert_eq!(
            serde_json::to_string(&StandardizedTime::Unknown).unwrap(),
            "\"Unknown\""
        );
        let back: StandardizedTime = serde_json::from_str("\"08:05:00\"").unwrap();
        assert_eq!(back.hour(), 8);
    }

    #[test]
    fn standardized_time_rejects_short_form() {
        assert!("14:30".parse::<StandardizedTime>().is_err());
        assert_eq!(
            "Unknown".parse::<StandardizedTime>().unwrap(),
            StandardizedTime::Unknown
        );
        assert_eq!(StandardizedTime::Unknown.hour(), UNKNOWN_HOUR);
    }

    #[test]
    fn weekday_conversion_uses_full_names() {
        assert_eq!(DayOfWeek::from(chrono::Weekday::Wed).to_string(), "Wednesday");
        assert_eq!(DayOfWeek::MONDAY_FIRST[6], DayOfWeek::Sunday);
    }

    #[test]
    fn canonical_column_names_round_trip() {
        for column in CanonicalColumn::all() {
            let name = column.to_string();
            assert_eq!(name.parse::<CanonicalColumn>().unwrap(), *column);
        }
        assert_eq!(CanonicalColumn::IncidentTime.as_ref(), "Incident Time");
    }

    #[test]
    fn dataset_collects_sorted_distinct_types() {
        let record = |kind: Option<&str>| IncidentRecord {
            incident_type: kind.map(String::from),
            ..IncidentRecord::default()
        };
        let dataset = IncidentDataset::new(vec![
            record(Some("Vandalism")),
            record(None),
            record(Some("Theft (minor)")),
            record(Some("Theft")),
            record(Some("Vandalism")),
        ]);

        assert_eq!(dataset.len(), 5);
        assert_eq!(
            dataset.incident_types(),
            ["Theft", "Theft (minor)", "Vandalism"]
        );
        assert!(dataset.has_incident_type("Theft (minor)"));
        assert!(!dataset.has_incident_type("theft"));
    }
}
