//! Derived incident fields.
//!
//! Turns one row of raw canonical values into an [`IncidentRecord`] in a
//! single pass: standardized time, hour, time-range bucket and weekday.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use incident_dashboard_incident_models::{
    DayOfWeek, IncidentRecord, StandardizedTime, TimeRange, UNKNOWN_HOUR,
};

use crate::dates::parse_date;
use crate::time::standardize_time;

/// One row's cell values, already keyed by canonical column.
///
/// Empty cells are `None`. Values are kept exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIncident {
    pub date: Option<String>,
    pub incident_time: Option<String>,
    pub incident_type: Option<String>,
    pub patron_1_name: Option<String>,
    pub patron_1_email: Option<String>,
    pub patron_2_name: Option<String>,
    pub patron_2_email: Option<String>,
    pub additional_contacts: Option<String>,
    pub description: Option<String>,
    pub action_taken: Option<String>,
    pub form_employee: Option<String>,
    /// Unmapped columns, keyed by cleaned header.
    pub extra: BTreeMap<String, String>,
}

/// Hour of a canonical `HH:MM:SS` string, or [`UNKNOWN_HOUR`] for anything
/// else (including `Unknown`).
#[must_use]
pub fn incident_hour(standardized: &str) -> i32 {
    standardized
        .parse::<StandardizedTime>()
        .map_or(UNKNOWN_HOUR, StandardizedTime::hour)
}

/// Weekday of a date; absent when the date is absent.
#[must_use]
pub fn day_of_week(date: Option<NaiveDate>) -> Option<DayOfWeek> {
    date.map(|d| DayOfWeek::from(d.weekday()))
}

/// Builds the normalized record for one row.
#[must_use]
pub fn derive_record(raw: RawIncident) -> IncidentRecord {
    let standardized_time = standardize_time(raw.incident_time.as_deref());
    let incident_hour = incident_hour(&standardized_time.to_string());
    let date = raw.date.as_deref().and_then(parse_date);

    if date.is_none()
        && let Some(value) = raw.date.as_deref()
    {
        log::debug!("Unparseable date '{value}', weekday left empty");
    }

    IncidentRecord {
        date,
        incident_time_raw: raw.incident_time,
        standardized_time,
        incident_hour,
        time_range: TimeRange::from_hour(incident_hour),
        day_of_week: day_of_week(date),
        incident_type: raw.incident_type,
        patron_1_name: raw.patron_1_name,
        patron_1_email: raw.patron_1_email,
        patron_2_name: raw.patron_2_name,
        patron_2_email: raw.patron_2_email,
        additional_contacts: raw.additional_contacts,
        description: raw.description,
        action_taken: raw.action_taken,
        form_employee: raw.form_employee,
        extra: raw.extra,
    }
}
