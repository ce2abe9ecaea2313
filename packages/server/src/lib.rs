#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident dashboard.
//!
//! Loads the incident spreadsheet once at startup, keeps the normalized
//! dataset in memory, and recomputes the chart aggregations on every
//! request. The static dashboard page is served from the same process.

mod handlers;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use incident_dashboard_incident_models::IncidentDataset;
use incident_dashboard_ingest::{LoadError, load_dataset, load_mapping};
use incident_dashboard_normalize::columns::ColumnMapping;
use thiserror::Error;

/// Default incident file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/incidents.xlsx";

/// Default directory holding the built dashboard page.
pub const DEFAULT_STATIC_DIR: &str = "app/dist";

/// Errors reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `PORT` is not a valid port number.
    #[error("Invalid port '{value}'")]
    InvalidPort {
        /// The rejected value.
        value: String,
    },
}

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The incident file or column mapping could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Binding or running the HTTP server failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to listen and what to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_path: PathBuf,
    /// Column mapping override; the built-in mapping is used when absent.
    pub columns_path: Option<PathBuf>,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            columns_path: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `INCIDENT_DATA_PATH`,
    /// `INCIDENT_COLUMNS_PATH` and `DASHBOARD_STATIC_DIR`, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` is set but not a port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` is set but not a port.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => defaults.port,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            data_path: lookup("INCIDENT_DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            columns_path: lookup("INCIDENT_COLUMNS_PATH").map(PathBuf::from),
            static_dir: lookup("DASHBOARD_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        })
    }
}

/// Shared application state.
///
/// Handlers take a snapshot of the dataset and compute without holding the
/// lock; a reload replaces the whole snapshot in one write.
pub struct AppState {
    /// File the dataset is (re)loaded from.
    pub data_path: PathBuf,
    /// Header mapping used for every load.
    pub mapping: ColumnMapping,
    dataset: RwLock<Arc<IncidentDataset>>,
}

impl AppState {
    #[must_use]
    pub fn new(data_path: PathBuf, mapping: ColumnMapping, dataset: IncidentDataset) -> Self {
        Self {
            data_path,
            mapping,
            dataset: RwLock::new(Arc::new(dataset)),
        }
    }

    /// Current dataset snapshot.
    #[must_use]
    pub fn dataset(&self) -> Arc<IncidentDataset> {
        Arc::clone(&self.dataset.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps in a new dataset.
    pub fn replace(&self, dataset: IncidentDataset) {
        *self.dataset.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(dataset);
    }

    /// Re-reads [`Self::data_path`] and swaps the result in. On failure the
    /// current dataset stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file can no longer be loaded.
    pub fn reload(&self) -> Result<usize, LoadError> {
        let dataset = load_dataset(&self.data_path, &self.mapping)?;
        let count = dataset.len();
        self.replace(dataset);
        Ok(count)
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/incident-types", web::get().to(handlers::incident_types))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/proportions", web::get().to(handlers::proportions))
            .route("/reload", web::post().to(handlers::reload)),
    );
}

/// Loads the dataset and starts the HTTP server.
///
/// This is a regular async function; the caller provides the runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the incident file cannot be loaded or the
/// server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mapping = load_mapping(config.columns_path.as_deref())?;
    let dataset = load_dataset(&config.data_path, &mapping)?;

    let state = web::Data::new(AppState::new(config.data_path.clone(), mapping, dataset));
    let static_dir = config.static_dir.clone();

    log::info!(
        "Starting server on {}:{} (static files from {})",
        config.bind_addr,
        config.port,
        static_dir.display()
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_when_env_is_empty() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/incidents.xlsx"));
    }

    #[test]
    fn config_reads_every_variable() {
        let config = ServerConfig::from_lookup(|key| {
            match key {
                "BIND_ADDR" => Some("0.0.0.0"),
                "PORT" => Some("9000"),
                "INCIDENT_DATA_PATH" => Some("/srv/reports.csv"),
                "INCIDENT_COLUMNS_PATH" => Some("/srv/columns.toml"),
                "DASHBOARD_STATIC_DIR" => Some("/srv/www"),
                _ => None,
            }
            .map(String::from)
        })
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.columns_path, Some(PathBuf::from("/srv/columns.toml")));
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let result = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidPort { value }) if value == "http"));
    }
}
