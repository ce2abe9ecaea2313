//! HTTP handler functions for the incident dashboard API.

use actix_web::{HttpResponse, web};
use incident_dashboard_analytics::{summarize, type_proportions};
use incident_dashboard_analytics_models::IncidentTypeFilter;
use incident_dashboard_server_models::{
    ApiHealth, DashboardQueryParams, IncidentTypeOptions, ReloadResponse,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/incident-types`
///
/// Selector options: "All Types" followed by every distinct incident type
/// seen at load, sorted.
pub async fn incident_types(state: web::Data<AppState>) -> HttpResponse {
    let dataset = state.dataset();
    HttpResponse::Ok().json(IncidentTypeOptions::from_types(dataset.incident_types()))
}

/// `GET /api/dashboard`
///
/// All chart aggregations for the selected incident type. Types that do not
/// occur in the dataset are rejected.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let dataset = state.dataset();
    let selection = params.selection();

    if let IncidentTypeFilter::Exact(value) = &selection
        && !dataset.has_incident_type(value)
    {
        log::warn!("Rejected unknown incident type '{value}'");
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Unknown incident type: {value}")
        }));
    }

    HttpResponse::Ok().json(summarize(&dataset, &selection))
}

/// `GET /api/proportions`
///
/// Dataset-wide share of each incident type.
pub async fn proportions(state: web::Data<AppState>) -> HttpResponse {
    let dataset = state.dataset();
    HttpResponse::Ok().json(type_proportions(dataset.records()))
}

/// `POST /api/reload`
///
/// Re-reads the incident file off the request thread and swaps the dataset
/// in. A failed reload leaves the previous dataset serving.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    let path = state.data_path.display().to_string();
    let result = web::block(move || state.reload()).await;

    match result {
        Ok(Ok(record_count)) => {
            log::info!("Reloaded {record_count} incidents from {path}");
            HttpResponse::Ok().json(ReloadResponse { record_count })
        }
        Ok(Err(e)) => {
            log::error!("Failed to reload {path}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Err(e) => {
            log::error!("Reload task failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use actix_web::{App, http::StatusCode, test, web};
    use incident_dashboard_analytics_models::{DashboardSummary, ProportionSlice};
    use incident_dashboard_incident_models::{IncidentDataset, IncidentRecord, TimeRange};
    use incident_dashboard_normalize::columns::ColumnMapping;
    use incident_dashboard_server_models::IncidentTypeOptions;

    use crate::{AppState, configure_api};

    fn record(kind: &str, hour: i32) -> IncidentRecord {
        IncidentRecord {
            incident_type: Some(kind.to_string()),
            incident_hour: hour,
            time_range: TimeRange::from_hour(hour),
            ..IncidentRecord::default()
        }
    }

    fn state(data_path: PathBuf) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            data_path,
            ColumnMapping::default_mapping(),
            IncidentDataset::new(vec![
                record("Theft", 14),
                record("Theft (minor)", 10),
                record("Vandalism", -1),
            ]),
        ))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("missing.csv")))
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn incident_types_list_all_first() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("missing.csv")))
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/incident-types")
            .to_request();
        let body: IncidentTypeOptions = test::call_and_read_body_json(&app, req).await;
        let values: Vec<&str> = body.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["All", "Theft", "Theft (minor)", "Vandalism"]);
        assert_eq!(body.options[0].label, "All Types");
    }

    #[actix_web::test]
    async fn dashboard_defaults_to_all() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("missing.csv")))
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let body: DashboardSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total_count, 3);
        assert_eq!(body.by_type[0].label, "Theft");
        assert_eq!(body.by_type[0].count, 2);
        assert_eq!(body.by_time_range.len(), 8);
    }

    #[actix_web::test]
    async fn dashboard_filters_by_exact_type() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("missing.csv")))
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/dashboard?incidentType=Theft%20(minor)")
            .to_request();
        let body: DashboardSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total_count, 1);
        assert_eq!(body.by_hour[0].hour, 10);
        assert_eq!(body.type_proportions.len(), 3);
    }

    #[actix_web::test]
    async fn dashboard_rejects_unknown_type() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("missing.csv")))
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/dashboard?incidentType=theft")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn proportions_cover_whole_dataset() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("missing.csv")))
                .configure(configure_api),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/proportions").to_request();
        let body: Vec<ProportionSlice> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 3);
        assert_eq!(body.iter().map(|p| p.count).sum::<u64>(), 3);
    }

    #[actix_web::test]
    async fn reload_swaps_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.csv");
        std::fs::write(
            &path,
            "Date,Time (AM or PM),Incident Type\n2024-01-15,2:15pm,Noise\n",
        )
        .unwrap();

        let app_state = state(path);
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/reload").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["recordCount"], 1);
        assert_eq!(app_state.dataset().incident_types(), ["Noise".to_string()]);
    }

    #[actix_web::test]
    async fn failed_reload_keeps_previous_dataset() {
        let app_state = state(PathBuf::from("/nonexistent/incidents.csv"));
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/reload").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app_state.dataset().len(), 3);
    }
}
