#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Starts the incident dashboard server.
//!
//! Settings come from the environment (see
//! [`incident_dashboard_server::ServerConfig::from_env`]); flags given on the
//! command line take precedence.

use std::path::PathBuf;

use clap::Parser;
use incident_dashboard_server::{ServerConfig, run_server};

#[derive(Parser)]
#[command(
    name = "incident_dashboard_server",
    about = "Serve the incident report dashboard"
)]
struct Args {
    /// Address to bind to
    #[arg(long)]
    bind_addr: Option<String>,
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
    /// Spreadsheet or CSV file with the incident reports
    #[arg(long)]
    data: Option<PathBuf>,
    /// TOML file overriding the built-in column mapping
    #[arg(long)]
    columns: Option<PathBuf>,
    /// Directory holding the dashboard page
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data) = self.data {
            config.data_path = data;
        }
        if self.columns.is_some() {
            config.columns_path = self.columns;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = static_dir;
        }
        config
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = Args::parse().apply(ServerConfig::from_env()?);
    run_server(config).await?;

    Ok(())
}
