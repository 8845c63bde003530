//! Importer for the national income composition table (header-keyed).

use std::io::Read;

use csv::StringRecord;
use tracing::debug;

use super::{csv_reader, line_of, parse_int, ImportSummary};
use crate::data::{IncomeBreakdown, Storage};
use crate::error::{DashError, DashResult};

const PERIOD_COLUMN: &str = "年份_季度";
const TOTAL_COLUMN: &str = "居民人均可支配收入_累计值";
const WAGE_COLUMN: &str = "居民人均可支配工资性收入_累计值";
const BUSINESS_COLUMN: &str = "居民人均可支配经营净收入_累计值";
const PROPERTY_COLUMN: &str = "居民人均可支配财产净收入_累计值";
const TRANSFER_COLUMN: &str = "居民人均可支配转移净收入_累计值";

/// Positions of the required columns within the header
struct ColumnIndex {
    period: usize,
    total: usize,
    wage: usize,
    business: usize,
    property: usize,
    transfer: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> DashResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashError::MissingColumn(name.to_string()))
        };
        Ok(ColumnIndex {
            period: find(PERIOD_COLUMN)?,
            total: find(TOTAL_COLUMN)?,
            wage: find(WAGE_COLUMN)?,
            business: find(BUSINESS_COLUMN)?,
            property: find(PROPERTY_COLUMN)?,
            transfer: find(TRANSFER_COLUMN)?,
        })
    }

    fn parse(&self, record: &StringRecord, expected_len: usize) -> DashResult<IncomeBreakdown> {
        let line = line_of(record);
        let cell = |idx: usize| {
            record.get(idx).ok_or(DashError::Schema {
                line,
                expected: expected_len,
                found: record.len(),
            })
        };
        let int = |idx: usize, column: &str| parse_int(cell(idx)?, line, column);

        Ok(IncomeBreakdown {
            period: cell(self.period)?.to_string(),
            total: int(self.total, TOTAL_COLUMN)?,
            wage: int(self.wage, WAGE_COLUMN)?,
            business: int(self.business, BUSINESS_COLUMN)?,
            property: int(self.property, PROPERTY_COLUMN)?,
            transfer: int(self.transfer, TRANSFER_COLUMN)?,
        })
    }
}

pub fn import_income_breakdowns<R: Read>(
    reader: R,
    storage: &Storage,
) -> DashResult<ImportSummary> {
    let mut reader = csv_reader(reader, true);
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut summary = ImportSummary::default();
    for result in reader.records() {
        let record = result?;
        summary.rows_read += 1;

        let income = columns.parse(&record, headers.len())?;
        let id = storage.insert(&income)?;
        debug!(id, record = %income, "inserted income breakdown");
        summary.records_inserted += 1;
    }

    Ok(summary)
}
