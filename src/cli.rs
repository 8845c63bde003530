//! Command-line interface argument parsing for income-charts.
//!
//! - `income-charts import-region provinces.csv`
//! - `income-charts render Income_province`
//! - `income-charts show --chart gini --color-palette "#FF0000,#00FF00"`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Environment variable overriding the default database location
pub const DB_ENV_VAR: &str = "INCOME_CHARTS_DB";

/// Import household income statistics and turn them into chart descriptions.
#[derive(Parser, Debug)]
#[command(name = "income-charts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite database file
    /// Defaults to $INCOME_CHARTS_DB, then the platform data directory
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a year x region matrix of per-capita income
    ImportRegion {
        /// CSV file whose header row names the regions
        csv_file: PathBuf,
    },

    /// Import per-period totals and income components
    ImportIncome {
        /// CSV file with labelled component columns
        csv_file: PathBuf,
    },

    /// Import Gini coefficients and cumulative growth rates
    ImportGini {
        /// CSV file with eight positional columns
        csv_file: PathBuf,
    },

    /// List the chart catalog
    Charts,

    /// Print one chart description as JSON
    Render {
        /// Chart name as listed by `charts`
        name: String,
    },

    /// Launch the terminal dashboard
    Show {
        /// Chart to open first
        #[arg(long)]
        chart: Option<String>,

        /// Comma-separated hex color palette for series
        /// Example: "#FF0000,#00FF00,#0000FF"
        #[arg(short, long)]
        color_palette: Option<String>,

        /// Refresh interval in seconds
        #[arg(short, long, default_value = "5")]
        interval: u64,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Database path from the flag, then the environment, then the data dir
pub fn resolve_db_path(db: Option<String>) -> PathBuf {
    db.map(PathBuf::from).unwrap_or_else(|| {
        if let Ok(path) = std::env::var(DB_ENV_VAR) {
            PathBuf::from(path)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("income-charts")
                .join("income.db")
        }
    })
}

/// Dashboard configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub initial_chart: Option<String>,
    pub color_palette: Vec<String>,
    pub refresh_interval_secs: u64,
    pub db_path: PathBuf,
}

impl AppConfig {
    pub fn from_show_command(
        chart: Option<String>,
        color_palette: Option<String>,
        interval: u64,
        db_path: PathBuf,
    ) -> Self {
        let colors = color_palette
            .map(|p| {
                p.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| {
                vec![
                    "#C23531".to_string(), // Red
                    "#2F4554".to_string(), // Slate
                    "#61A0A8".to_string(), // Teal
                    "#D48265".to_string(), // Orange
                    "#91C7AE".to_string(), // Green
                    "#749F83".to_string(), // Olive
                    "#CA8622".to_string(), // Gold
                    "#BDA29A".to_string(), // Rose
                ]
            });

        AppConfig {
            initial_chart: chart,
            color_palette: colors,
            // Zero would spin the refresh loop
            refresh_interval_secs: interval.max(1),
            db_path,
        }
    }
}
