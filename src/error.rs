//! Domain error type shared by ingestion, storage and chart building.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    /// A cell could not be converted to its expected numeric type
    #[error("line {line}: cannot parse {column} value {value:?} as {expected}")]
    Parse {
        line: u64,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// A row's cell count does not match the header
    #[error("line {line}: expected {expected} cells, found {found}")]
    Schema {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("missing column {0:?} in CSV header")]
    MissingColumn(String),

    /// A presentation query returned no rows for the requested scope
    #[error("no {0} rows found")]
    EmptyResult(&'static str),

    /// Summing stored values left the `i64` range
    #[error("sum of {0} overflows")]
    Overflow(&'static str),

    #[error("unknown chart: {0}")]
    UnknownChart(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DashResult<T> = Result<T, DashError>;
