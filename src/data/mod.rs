//! Data layer for the survey database.
//!
//! Handles the record models and reading/writing them through SQLite.

mod models;
mod storage;

pub use models::{GrowthSeries, IncomeBreakdown, RegionMetric};
pub use storage::{Query, Record, Storage};
