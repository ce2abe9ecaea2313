#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident dashboard server.
//!
//! Aggregation results are served as-is from the analytics models; the
//! types here cover the envelope around them.

use incident_dashboard_analytics_models::{ALL_SELECTION, IncidentTypeFilter};
use serde::{Deserialize, Serialize};

/// Label shown for the no-filter option.
pub const ALL_TYPES_LABEL: &str = "All Types";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// One entry of the incident type selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTypeOption {
    /// Text shown to the user.
    pub label: String,
    /// Value sent back as `incidentType`.
    pub value: String,
}

/// Options for the incident type selector, "All Types" first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTypeOptions {
    pub options: Vec<IncidentTypeOption>,
}

impl IncidentTypeOptions {
    /// Builds the selector from the dataset's distinct incident types.
    #[must_use]
    pub fn from_types(types: &[String]) -> Self {
        let options = std::iter::once(IncidentTypeOption {
            label: ALL_TYPES_LABEL.to_string(),
            value: ALL_SELECTION.to_string(),
        })
        .chain(types.iter().map(|t| IncidentTypeOption {
            label: t.clone(),
            value: t.clone(),
        }))
        .collect();

        Self { options }
    }
}

/// Query parameters for `GET /api/dashboard`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Selected incident type; absent means `All`.
    pub incident_type: Option<String>,
}

impl DashboardQueryParams {
    #[must_use]
    pub fn selection(&self) -> IncidentTypeFilter {
        self.incident_type
            .as_deref()
            .map_or(IncidentTypeFilter::All, IncidentTypeFilter::from_selection)
    }
}

/// Result of `POST /api/reload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    /// Records in the newly loaded dataset.
    pub record_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_put_all_types_first() {
        let types = vec!["Noise".to_string(), "Theft".to_string()];
        let options = IncidentTypeOptions::from_types(&types).options;
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, "All Types");
        assert_eq!(options[0].value, "All");
        assert_eq!(options[2].value, "Theft");
    }

    #[test]
    fn missing_selection_means_all() {
        assert_eq!(
            DashboardQueryParams::default().selection(),
            IncidentTypeFilter::All
        );
        let params = DashboardQueryParams {
            incident_type: Some("Theft".to_string()),
        };
        assert_eq!(
            params.selection(),
            IncidentTypeFilter::Exact("Theft".to_string())
        );
    }

    #[test]
    fn reload_response_is_camel_case() {
        let json = serde_json::to_string(&ReloadResponse { record_count: 3 }).unwrap();
        assert_eq!(json, r#"{"recordCount":3}"#);
    }
}
