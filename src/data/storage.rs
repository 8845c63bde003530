//! SQLite storage layer for the imported survey tables.
//!
//! Schema (created on open):
//! - `region_metrics`: id, region, year, value
//! - `income_breakdowns`: id, period, total, wage, business, property, transfer
//! - `growth_series`: id, period, gini, six growth-rate columns
//!
//! Tables are append-only. There are no uniqueness constraints, so importing
//! the same file twice stores every row twice.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use tracing::debug;

use super::models::{GrowthSeries, IncomeBreakdown, RecordId, RegionMetric};
use crate::error::DashResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS region_metrics (
    id INTEGER PRIMARY KEY,
    region TEXT NOT NULL,
    year INTEGER NOT NULL,
    value INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS income_breakdowns (
    id INTEGER PRIMARY KEY,
    period TEXT NOT NULL,
    total INTEGER NOT NULL,
    wage INTEGER NOT NULL,
    business INTEGER NOT NULL,
    property INTEGER NOT NULL,
    transfer INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS growth_series (
    id INTEGER PRIMARY KEY,
    period TEXT NOT NULL,
    gini REAL NOT NULL,
    disposable_growth REAL NOT NULL,
    median_disposable_growth REAL NOT NULL,
    wage_growth REAL NOT NULL,
    business_growth REAL NOT NULL,
    property_growth REAL NOT NULL,
    transfer_growth REAL NOT NULL
);
";

/// A flat record type persisted in its own table
pub trait Record: Sized {
    /// Entity name used in logs and empty-result errors
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Column names in insert/select order, excluding `id`
    const COLUMNS: &'static [&'static str];
    /// Column holding the time key (year or period)
    const KEY_COLUMN: &'static str;

    fn to_values(&self) -> Vec<Value>;
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

impl Record for RegionMetric {
    const ENTITY: &'static str = "region metric";
    const TABLE: &'static str = "region_metrics";
    const COLUMNS: &'static [&'static str] = &["region", "year", "value"];
    const KEY_COLUMN: &'static str = "year";

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.region.clone()),
            Value::Integer(self.year.into()),
            Value::Integer(self.value),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(RegionMetric {
            region: row.get(0)?,
            year: row.get(1)?,
            value: row.get(2)?,
        })
    }
}

impl Record for IncomeBreakdown {
    const ENTITY: &'static str = "income breakdown";
    const TABLE: &'static str = "income_breakdowns";
    const COLUMNS: &'static [&'static str] =
        &["period", "total", "wage", "business", "property", "transfer"];
    const KEY_COLUMN: &'static str = "period";

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.period.clone()),
            Value::Integer(self.total),
            Value::Integer(self.wage),
            Value::Integer(self.business),
            Value::Integer(self.property),
            Value::Integer(self.transfer),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(IncomeBreakdown {
            period: row.get(0)?,
            total: row.get(1)?,
            wage: row.get(2)?,
            business: row.get(3)?,
            property: row.get(4)?,
            transfer: row.get(5)?,
        })
    }
}

impl Record for GrowthSeries {
    const ENTITY: &'static str = "growth series";
    const TABLE: &'static str = "growth_series";
    const COLUMNS: &'static [&'static str] = &[
        "period",
        "gini",
        "disposable_growth",
        "median_disposable_growth",
        "wage_growth",
        "business_growth",
        "property_growth",
        "transfer_growth",
    ];
    const KEY_COLUMN: &'static str = "period";

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.period.clone()),
            Value::Real(self.gini),
            Value::Real(self.disposable_growth),
            Value::Real(self.median_disposable_growth),
            Value::Real(self.wage_growth),
            Value::Real(self.business_growth),
            Value::Real(self.property_growth),
            Value::Real(self.transfer_growth),
        ]
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(GrowthSeries {
            period: row.get(0)?,
            gini: row.get(1)?,
            disposable_growth: row.get(2)?,
            median_disposable_growth: row.get(3)?,
            wage_growth: row.get(4)?,
            business_growth: row.get(5)?,
            property_growth: row.get(6)?,
            transfer_growth: row.get(7)?,
        })
    }
}

/// Row filter applied to a record's key column
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    #[default]
    All,
    /// Key column equals the given year
    Year(i32),
    /// Key column text starts with the given prefix (e.g. `"2015"` matches `2015_Q1`)
    PeriodPrefix(String),
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Storage read order, i.e. insertion order
    #[default]
    Insertion,
    /// Key column ascending (lexicographic for text periods), ties in insertion order
    Key,
}

/// A read request against one record table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub order: Order,
}

impl Query {
    pub fn all() -> Self {
        Query::default()
    }

    #[allow(dead_code)] // Used in tests
    pub fn year(year: i32) -> Self {
        Query {
            filter: Filter::Year(year),
            order: Order::Insertion,
        }
    }

    pub fn period_prefix(prefix: impl Into<String>) -> Self {
        Query {
            filter: Filter::PeriodPrefix(prefix.into()),
            order: Order::Insertion,
        }
    }

    pub fn ordered_by_key(mut self) -> Self {
        self.order = Order::Key;
        self
    }

    /// Build the SELECT statement and its parameters for record type `R`
    fn to_sql<R: Record>(&self) -> (String, Vec<Value>) {
        let key = R::KEY_COLUMN;
        let mut sql = format!("SELECT {} FROM {}", R::COLUMNS.join(", "), R::TABLE);
        let mut params = Vec::new();

        match &self.filter {
            Filter::All => {}
            Filter::Year(year) => {
                sql.push_str(&format!(" WHERE {key} = ?1"));
                params.push(Value::Integer((*year).into()));
            }
            Filter::PeriodPrefix(prefix) => {
                sql.push_str(&format!(" WHERE substr({key}, 1, length(?1)) = ?1"));
                params.push(Value::Text(prefix.clone()));
            }
        }

        match self.order {
            Order::Insertion => sql.push_str(" ORDER BY id"),
            Order::Key => sql.push_str(&format!(" ORDER BY {key}, id")),
        }

        (sql, params)
    }
}

/// Storage interface for the survey database
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (creating if needed) the database file at `path`
    pub fn open(path: &Path) -> DashResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    /// Open a fresh in-memory database
    #[allow(dead_code)] // Used in tests
    pub fn in_memory() -> DashResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DashResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Storage { conn })
    }

    /// Insert one record and return its assigned id
    pub fn insert<R: Record>(&self, record: &R) -> DashResult<RecordId> {
        let placeholders = (1..=R::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            R::TABLE,
            R::COLUMNS.join(", ")
        );
        self.conn
            .prepare_cached(&sql)?
            .execute(params_from_iter(record.to_values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Read records matching `query`
    pub fn query<R: Record>(&self, query: &Query) -> DashResult<Vec<R>> {
        let (sql, params) = query.to_sql::<R>();
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), |row| R::from_row(row))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Number of stored records of type `R`
    pub fn count<R: Record>(&self) -> DashResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
