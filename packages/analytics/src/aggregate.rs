//! Group-and-count helpers behind each dashboard chart.
//!
//! Every helper takes the already-filtered records and returns its groups in
//! display order.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use incident_dashboard_analytics_models::{DayOfWeekCounts, HourCount, LabelCount, ProportionSlice};
use incident_dashboard_incident_models::{DayOfWeek, IncidentRecord, TimeRange};
use regex::Regex;

/// Number of records.
#[must_use]
pub fn total_count(records: &[&IncidentRecord]) -> u64 {
    records.len() as u64
}

/// Parenthetical qualifier plus any whitespace before it.
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*?\)").unwrap_or_else(|_| unreachable!()));

/// Strips every parenthetical qualifier from an incident type.
///
/// `"Theft (minor)"` and `"Theft (bike) (repeat)"` both become `"Theft"`.
#[must_use]
pub fn clean_incident_type(incident_type: &str) -> String {
    PARENTHETICAL
        .replace_all(incident_type, "")
        .trim()
        .to_string()
}

/// Counts by cleaned incident type, most frequent first; ties break on label.
/// Records without a type are left out.
#[must_use]
pub fn count_by_clean_type(records: &[&IncidentRecord]) -> Vec<LabelCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for kind in records.iter().filter_map(|r| r.incident_type.as_deref()) {
        *counts.entry(clean_incident_type(kind)).or_default() += 1;
    }

    sorted_by_count(counts)
}

/// Counts by hour, ascending. Records with no valid hour group under `-1`.
#[must_use]
pub fn count_by_hour(records: &[&IncidentRecord]) -> Vec<HourCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.incident_hour).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

/// Counts per time-range bucket. All eight buckets are always present, in
/// [`TimeRange::ordered`] order.
#[must_use]
pub fn count_by_time_range(records: &[&IncidentRecord]) -> Vec<LabelCount> {
    let mut counts: BTreeMap<TimeRange, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.time_range).or_default() += 1;
    }

    TimeRange::ordered()
        .iter()
        .map(|range| LabelCount {
            label: range.to_string(),
            count: counts.get(range).copied().unwrap_or(0),
        })
        .collect()
}

/// Counts per weekday in the given order. Records whose date could not be
/// parsed are counted in `unparsed` instead.
#[must_use]
pub fn count_by_day_of_week(records: &[&IncidentRecord], order: &[DayOfWeek]) -> DayOfWeekCounts {
    let mut counts: BTreeMap<DayOfWeek, u64> = BTreeMap::new();
    let mut unparsed = 0;
    for record in records {
        match record.day_of_week {
            Some(day) => *counts.entry(day).or_default() += 1,
            None => unparsed += 1,
        }
    }

    let days = order
        .iter()
        .map(|day| LabelCount {
            label: day.to_string(),
            count: counts.get(day).copied().unwrap_or(0),
        })
        .collect();

    DayOfWeekCounts { days, unparsed }
}

/// Share of each raw incident type among the records that have one.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn type_proportions(records: &[IncidentRecord]) -> Vec<ProportionSlice> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for kind in records.iter().filter_map(|r| r.incident_type.as_deref()) {
        *counts.entry(kind.to_string()).or_default() += 1;
    }

    let typed: u64 = counts.values().sum();

    sorted_by_count(counts)
        .into_iter()
        .map(|LabelCount { label, count }| ProportionSlice {
            label,
            count,
            fraction: count as f64 / typed as f64,
        })
        .collect()
}

fn sorted_by_count(counts: BTreeMap<String, u64>) -> Vec<LabelCount> {
    let mut groups: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    // BTreeMap already yields labels ascending, so a stable sort keeps ties
    // in label order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
