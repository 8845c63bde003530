//! income-charts: imports household income statistics from CSV into SQLite
//! and reshapes them into renderer-ready chart descriptions.
//!
//! Charts are printed as JSON or drawn by a keyboard-driven terminal dashboard.

mod app;
mod charts;
mod cli;
mod data;
mod error;
mod ingest;
mod reshape;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use charts::ChartRegistry;
use cli::{resolve_db_path, AppConfig, Cli, Commands};
use data::Storage;
use ingest::{import_file, ImportKind};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // The dashboard owns the terminal, log lines would tear the alternate screen
    init_logging(if matches!(cli.command, Commands::Show { .. }) {
        "off"
    } else {
        "info"
    });

    let db_path = resolve_db_path(cli.db);
    let registry = ChartRegistry::standard();

    match cli.command {
        Commands::ImportRegion { csv_file } => import(ImportKind::Region, &csv_file, &db_path)?,
        Commands::ImportIncome { csv_file } => import(ImportKind::Income, &csv_file, &db_path)?,
        Commands::ImportGini { csv_file } => import(ImportKind::Growth, &csv_file, &db_path)?,
        Commands::Charts => {
            for entry in registry.entries() {
                println!("{}", entry.listing());
            }
        }
        Commands::Render { name } => {
            let storage = open_storage(&db_path)?;
            let chart = registry
                .render(&name, &storage)
                .with_context(|| format!("Failed to render chart {name}"))?;
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        Commands::Show {
            chart,
            color_palette,
            interval,
        } => {
            let config = AppConfig::from_show_command(chart, color_palette, interval, db_path);
            app::run(config, &registry)?;
        }
    }

    Ok(())
}

/// stderr subscriber honoring `RUST_LOG`, falling back to `default_level`
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_storage(db_path: &Path) -> Result<Storage> {
    Storage::open(db_path).with_context(|| format!("Failed to open database {}", db_path.display()))
}

fn import(kind: ImportKind, csv_file: &Path, db_path: &Path) -> Result<()> {
    let storage = open_storage(db_path)?;
    let summary = import_file(kind, csv_file, &storage)
        .with_context(|| format!("Failed to import {} from {}", kind.label(), csv_file.display()))?;
    println!(
        "Imported {} {} from {} rows ({} stored)",
        summary.records_inserted,
        kind.label(),
        summary.rows_read,
        kind.stored(&storage)?
    );
    Ok(())
}
