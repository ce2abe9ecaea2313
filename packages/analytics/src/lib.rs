#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and aggregation over a loaded incident dataset.
//!
//! Everything here is pure: the same dataset and selection always produce
//! the same [`DashboardSummary`]. Results are recomputed per request.

pub mod aggregate;
pub mod filter;

use incident_dashboard_analytics_models::{DashboardSummary, IncidentTypeFilter};
use incident_dashboard_incident_models::{DayOfWeek, IncidentDataset};

pub use aggregate::{
    clean_incident_type, count_by_clean_type, count_by_day_of_week, count_by_hour,
    count_by_time_range, total_count, type_proportions,
};
pub use filter::filter;

/// Computes every chart for one selection.
///
/// The type proportions always cover the whole dataset, whatever the
/// selection.
#[must_use]
pub fn summarize(dataset: &IncidentDataset, selection: &IncidentTypeFilter) -> DashboardSummary {
    let records = filter(dataset.records(), selection);

    log::debug!(
        "Summarizing {} of {} records for selection '{selection}'",
        records.len(),
        dataset.len()
    );

    DashboardSummary {
        selection: selection.clone(),
        total_count: total_count(&records),
        by_type: count_by_clean_type(&records),
        by_hour: count_by_hour(&records),
        by_time_range: count_by_time_range(&records),
        by_day_of_week: count_by_day_of_week(&records, &DayOfWeek::MONDAY_FIRST),
        type_proportions: type_proportions(dataset.records()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_dashboard_incident_models::{IncidentRecord, TimeRange};

    fn record(kind: &str, hour: i32) -> IncidentRecord {
        IncidentRecord {
            incident_type: Some(kind.to_string()),
            incident_hour: hour,
            time_range: TimeRange::from_hour(hour),
            ..IncidentRecord::default()
        }
    }

    fn dataset() -> IncidentDataset {
        IncidentDataset::new(vec![
            record("Theft", 14),
            record("Theft (minor)", 10),
            record("Vandalism", -1),
        ])
    }

    #[test]
    fn summary_for_all_covers_every_record() {
        let summary = summarize(&dataset(), &IncidentTypeFilter::All);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.by_type[0].label, "Theft");
        assert_eq!(summary.by_type[0].count, 2);
        assert_eq!(summary.by_day_of_week.unparsed, 3);
    }

    #[test]
    fn proportions_ignore_selection() {
        let data = dataset();
        let all = summarize(&data, &IncidentTypeFilter::All);
        let theft = summarize(&data, &IncidentTypeFilter::Exact("Vandalism".to_string()));
        assert_eq!(theft.total_count, 1);
        assert_eq!(theft.by_hour.len(), 1);
        assert_eq!(theft.by_hour[0].hour, -1);
        assert_eq!(all.type_proportions, theft.type_proportions);
    }

    #[test]
    fn unmatched_selection_is_empty_but_well_formed() {
        let summary = summarize(&dataset(), &IncidentTypeFilter::Exact("Fire".to_string()));
        assert_eq!(summary.total_count, 0);
        assert!(summary.by_type.is_empty());
        assert_eq!(summary.by_time_range.len(), 8);
        assert_eq!(summary.by_day_of_week.days.len(), 7);
    }
}
