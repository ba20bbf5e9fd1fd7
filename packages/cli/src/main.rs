#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line caller for the area metrics engine.
//!
//! Reads area documents (JSON) and delimited index files from disk, runs
//! the pure calculators, and prints JSON reports. All file I/O lives
//! here; the engine crates only ever see in-memory snapshots.

mod document;

use std::path::PathBuf;

use area_compare_import::{ImportOptions, ParsedTable};
use area_compare_metrics_models::definitions;
use clap::{Parser, Subcommand};

use crate::document::{AreaReport, ComparisonReport, load_area};

#[derive(Parser)]
#[command(name = "area_compare_cli", about = "Urban area metrics and comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single area document and print its metrics
    Score {
        /// Path to an area document (JSON)
        #[arg(long)]
        area: PathBuf,
    },
    /// Compare two area documents metric by metric
    Compare {
        /// Path to the first area document (JSON)
        #[arg(long)]
        a: PathBuf,
        /// Path to the second (baseline) area document (JSON)
        #[arg(long)]
        b: PathBuf,
    },
    /// Import an externally produced index from a delimited text file
    ImportIndex {
        /// Path to the CSV/TSV file
        #[arg(long)]
        file: PathBuf,
        /// Header of the column holding the numeric values
        #[arg(long)]
        value_column: String,
        /// Column holding area names (preferred row key)
        #[arg(long)]
        area_column: Option<String>,
        /// Column holding explicit row ids
        #[arg(long)]
        id_column: Option<String>,
        /// Latitude column (used with --lon-column as a fallback key)
        #[arg(long)]
        lat_column: Option<String>,
        /// Longitude column
        #[arg(long)]
        lon_column: Option<String>,
        /// Display name for the imported index
        #[arg(long)]
        name: Option<String>,
        /// Unit label for display
        #[arg(long)]
        unit: Option<String>,
    },
    /// Print the derived metric definition table
    Definitions,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score { area } => {
            let (name, ctx) = load_area(&area)?;
            let report = AreaReport::build(&name, &ctx);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Compare { a, b } => {
            let (name_a, ctx_a) = load_area(&a)?;
            let (name_b, ctx_b) = load_area(&b)?;
            let report = ComparisonReport::build(&name_a, &ctx_a, &name_b, &ctx_b);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::ImportIndex {
            file,
            value_column,
            area_column,
            id_column,
            lat_column,
            lon_column,
            name,
            unit,
        } => {
            let text = std::fs::read_to_string(&file)?;
            let table = ParsedTable::parse(&text)?;
            log::info!(
                "Parsed {} rows with columns: {}",
                table.row_count(),
                table.headers().join(", ")
            );
            let options = ImportOptions {
                value_column,
                area_column,
                id_column,
                lat_column,
                lon_column,
                name,
                unit,
                source: file.display().to_string(),
            };
            let index = table.import(&options)?;
            println!("{}", serde_json::to_string_pretty(&index)?);
        }
        Commands::Definitions => {
            println!("{}", serde_json::to_string_pretty(definitions())?);
        }
    }

    Ok(())
}
