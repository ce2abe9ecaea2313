//! Incident type selection.

use incident_dashboard_analytics_models::IncidentTypeFilter;
use incident_dashboard_incident_models::IncidentRecord;

/// Returns `true` when `record` passes `filter`.
///
/// `Exact` compares the raw incident type case-sensitively; records without
/// a type never match it.
#[must_use]
pub fn matches(record: &IncidentRecord, filter: &IncidentTypeFilter) -> bool {
    match filter {
        IncidentTypeFilter::All => true,
        IncidentTypeFilter::Exact(value) => record.incident_type.as_deref() == Some(value.as_str()),
    }
}

/// Records passing `filter`, in their original order.
#[must_use]
pub fn filter<'a>(
    records: &'a [IncidentRecord],
    filter: &IncidentTypeFilter,
) -> Vec<&'a IncidentRecord> {
    records.iter().filter(|r| matches(r, filter)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: Option<&str>) -> IncidentRecord {
        IncidentRecord {
            incident_type: kind.map(String::from),
            ..IncidentRecord::default()
        }
    }

    #[test]
    fn all_returns_every_record() {
        let records = vec![record(Some("Theft")), record(None), record(Some("Noise"))];
        let selected = filter(&records, &IncidentTypeFilter::All);
        assert_eq!(selected.len(), records.len());
    }

    #[test]
    fn exact_is_case_sensitive_and_whole_value() {
        let records = vec![
            record(Some("Theft")),
            record(Some("theft")),
            record(Some("Theft (bike)")),
            record(None),
        ];
        let selected = filter(&records, &IncidentTypeFilter::Exact("Theft".to_string()));
        assert_eq!(selected.len(), 1);
        assert!(
            selected
                .iter()
                .all(|r| r.incident_type.as_deref() == Some("Theft"))
        );
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let records = vec![record(Some("Theft")), record(Some("Noise")), record(Some("Theft"))];
        let selection = IncidentTypeFilter::Exact("Theft".to_string());
        let once = filter(&records, &selection);
        let owned: Vec<IncidentRecord> = once.iter().map(|r| (*r).clone()).collect();
        let twice = filter(&owned, &selection);
        assert_eq!(once.len(), twice.len());
    }
}
