//! Importer for the Gini coefficient and growth-rate table.
//!
//! Columns are read by position; the header row is skipped without being
//! inspected. Cells beyond the eighth are ignored.

use std::io::Read;

use tracing::debug;

use super::{csv_reader, line_of, parse_float, ImportSummary};
use crate::data::{GrowthSeries, Storage};
use crate::error::{DashError, DashResult};

/// Column names used in error messages, in file order
const COLUMNS: [&str; 8] = [
    "period",
    "gini_coefficient",
    "disposable_income_growth",
    "median_disposable_income_growth",
    "wage_income_growth",
    "business_income_growth",
    "property_income_growth",
    "transfer_income_growth",
];

pub fn import_growth_series<R: Read>(reader: R, storage: &Storage) -> DashResult<ImportSummary> {
    let mut reader = csv_reader(reader, true);

    let mut summary = ImportSummary::default();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        summary.rows_read += 1;

        if record.len() < COLUMNS.len() {
            return Err(DashError::Schema {
                line,
                expected: COLUMNS.len(),
                found: record.len(),
            });
        }

        let num = |idx: usize| parse_float(&record[idx], line, COLUMNS[idx]);
        let series = GrowthSeries {
            period: record[0].to_string(),
            gini: num(1)?,
            disposable_growth: num(2)?,
            median_disposable_growth: num(3)?,
            wage_growth: num(4)?,
            business_growth: num(5)?,
            property_growth: num(6)?,
            transfer_growth: num(7)?,
        };

        let id = storage.insert(&series)?;
        debug!(id, record = %series, "inserted growth series");
        summary.records_inserted += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Query;

    const HEADER: &str = "年份_季度,基尼系数,可支配收入增长,中位数增长,工资性增长,经营净增长,财产净增长,转移净增长\n";

    #[test]
    fn test_header_skipped_and_values_exact() {
        let input = format!("{HEADER}2014_Q1,0.469,12.3,11.8,10.2,7.9,12.1,-0.35\n");
        let storage = Storage::in_memory().unwrap();
        let summary = import_growth_series(input.as_bytes(), &storage).unwrap();
        assert_eq!(summary.rows_read, 1);

        let rows: Vec<GrowthSeries> = storage.query(&Query::all()).unwrap();
        assert_eq!(
            rows,
            vec![GrowthSeries {
                period: "2014_Q1".to_string(),
                gini: 0.469,
                disposable_growth: 12.3,
                median_disposable_growth: 11.8,
                wage_growth: 10.2,
                business_growth: 7.9,
                property_growth: 12.1,
                transfer_growth: -0.35,
            }]
        );
    }

    #[test]
    fn test_header_only_file_imports_nothing() {
        let storage = Storage::in_memory().unwrap();
        let summary = import_growth_series(HEADER.as_bytes(), &storage).unwrap();
        assert_eq!(summary, ImportSummary::default());
    }

    #[test]
    fn test_non_numeric_cell_is_parse_error() {
        let input = format!("{HEADER}2014_Q1,0.469,12.3,--,10.2,7.9,12.1,1.0\n");
        let storage = Storage::in_memory().unwrap();
        let err = import_growth_series(input.as_bytes(), &storage).unwrap_err();
        match err {
            DashError::Parse { column, value, .. } => {
                assert_eq!(column, "median_disposable_income_growth");
                assert_eq!(value, "--");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_row_is_schema_error() {
        let input = format!("{HEADER}2014_Q1,0.469,12.3\n");
        let storage = Storage::in_memory().unwrap();
        let err = import_growth_series(input.as_bytes(), &storage).unwrap_err();
        assert!(matches!(err, DashError::Schema { expected: 8, found: 3, .. }));
    }

    #[test]
    fn test_reimport_appends_duplicates() {
        let input = format!("{HEADER}2014_Q1,0.469,12.3,11.8,10.2,7.9,12.1,1.0\n");
        let storage = Storage::in_memory().unwrap();
        import_growth_series(input.as_bytes(), &storage).unwrap();
        import_growth_series(input.as_bytes(), &storage).unwrap();
        assert_eq!(storage.count::<GrowthSeries>().unwrap(), 2);
    }
}
