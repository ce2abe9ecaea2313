#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for inspecting an incident spreadsheet without starting the server.
//!
//! Every subcommand prints JSON to stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use incident_dashboard_analytics_models::IncidentTypeFilter;
use incident_dashboard_ingest::{load_dataset, load_mapping, missing_required_columns, read_table};
use incident_dashboard_normalize::columns::normalize_headers;
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "incident_dashboard_ingest",
    about = "Load and inspect incident report spreadsheets"
)]
struct Cli {
    /// Spreadsheet or CSV file to load
    #[arg(env = "INCIDENT_DATA_PATH")]
    file: PathBuf,
    /// TOML file overriding the built-in column mapping
    #[arg(long, env = "INCIDENT_COLUMNS_PATH")]
    columns: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how each header in the file maps to a canonical column
    Columns,
    /// List the distinct incident types in the file
    Types,
    /// Print the dashboard aggregations
    Summary {
        /// Incident type to filter by ("All" for no filter)
        #[arg(long, default_value = "All")]
        incident_type: String,
    },
    /// Print normalized records
    Records {
        /// Maximum number of records to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mapping = load_mapping(cli.columns.as_deref())?;

    let output = match cli.command {
        Commands::Columns => {
            let table = read_table(&cli.file)?;
            let headers = normalize_headers(&table.headers, &mapping);
            let missing: Vec<String> = missing_required_columns(&headers)
                .iter()
                .map(ToString::to_string)
                .collect();
            let columns: Vec<_> = table
                .headers
                .iter()
                .zip(&headers)
                .map(|(raw, header)| {
                    json!({
                        "raw": raw,
                        "name": header.name,
                        "canonical": header.canonical.map(|c| c.to_string()),
                    })
                })
                .collect();
            json!({ "columns": columns, "missingRequired": missing })
        }
        Commands::Types => {
            let dataset = load_dataset(&cli.file, &mapping)?;
            json!({ "incidentTypes": dataset.incident_types() })
        }
        Commands::Summary { incident_type } => {
            let dataset = load_dataset(&cli.file, &mapping)?;
            let selection = IncidentTypeFilter::from_selection(&incident_type);
            if let IncidentTypeFilter::Exact(value) = &selection
                && !dataset.has_incident_type(value)
            {
                log::warn!("Incident type '{value}' does not occur in {}", cli.file.display());
            }
            serde_json::to_value(incident_dashboard_analytics::summarize(&dataset, &selection))?
        }
        Commands::Records { limit } => {
            let dataset = load_dataset(&cli.file, &mapping)?;
            let records = dataset.records();
            let shown = &records[..limit.map_or(records.len(), |n| n.min(records.len()))];
            serde_json::to_value(shown)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
