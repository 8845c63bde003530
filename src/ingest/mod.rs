//! CSV importers for the three survey tables.
//!
//! Each importer reads a delimited file, converts every data row into typed
//! records and inserts them one at a time. There is no transaction: when a
//! row fails to parse, the rows before it stay committed and the import
//! stops with the error.

mod growth;
mod income;
mod region;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::data::{GrowthSeries, IncomeBreakdown, RegionMetric, Storage};
use crate::error::{DashError, DashResult};

pub use growth::import_growth_series;
pub use income::import_income_breakdowns;
pub use region::import_region_metrics;

/// Counts reported at the end of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows read, excluding the header
    pub rows_read: usize,
    pub records_inserted: usize,
}

/// Which table a CSV file feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Region,
    Income,
    Growth,
}

impl ImportKind {
    pub fn label(self) -> &'static str {
        match self {
            ImportKind::Region => "region metrics",
            ImportKind::Income => "income breakdowns",
            ImportKind::Growth => "gini and growth series",
        }
    }

    /// Rows currently stored in the table this kind feeds
    pub fn stored(self, storage: &Storage) -> DashResult<usize> {
        match self {
            ImportKind::Region => storage.count::<RegionMetric>(),
            ImportKind::Income => storage.count::<IncomeBreakdown>(),
            ImportKind::Growth => storage.count::<GrowthSeries>(),
        }
    }
}

/// Open `path` and run the importer for `kind` against `storage`
pub fn import_file(kind: ImportKind, path: &Path, storage: &Storage) -> DashResult<ImportSummary> {
    let file = File::open(path)?;
    info!(path = %path.display(), kind = kind.label(), "importing");

    let summary = match kind {
        ImportKind::Region => import_region_metrics(file, storage)?,
        ImportKind::Income => import_income_breakdowns(file, storage)?,
        ImportKind::Growth => import_growth_series(file, storage)?,
    };

    info!(
        rows = summary.rows_read,
        records = summary.records_inserted,
        kind = kind.label(),
        "import finished"
    );
    Ok(summary)
}

/// Comma-delimited reader that trims cells and leaves row-length checks to the importers
fn csv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// 1-based line number of a record, for error messages
fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_int(value: &str, line: u64, column: &str) -> DashResult<i64> {
    value.parse::<i64>().map_err(|_| DashError::Parse {
        line,
        column: column.to_string(),
        value: value.to_string(),
        expected: "integer",
    })
}

fn parse_float(value: &str, line: u64, column: &str) -> DashResult<f64> {
    value.parse::<f64>().map_err(|_| DashError::Parse {
        line,
        column: column.to_string(),
        value: value.to_string(),
        expected: "number",
    })
}
