//! Importer for the wide region-by-year table.
//!
//! Layout: the header's first cell labels the year column and every other
//! header cell is a region name. Each data row holds a year followed by one
//! value per region, producing one `RegionMetric` per value cell.

use std::io::Read;

use tracing::debug;

use super::{csv_reader, line_of, parse_int, ImportSummary};
use crate::data::{RegionMetric, Storage};
use crate::error::{DashError, DashResult};

pub fn import_region_metrics<R: Read>(reader: R, storage: &Storage) -> DashResult<ImportSummary> {
    let mut reader = csv_reader(reader, true);
    let headers = reader.headers()?.clone();
    let year_column = headers.get(0).unwrap_or("year").to_string();

    let mut summary = ImportSummary::default();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        summary.rows_read += 1;

        if record.len() != headers.len() {
            return Err(DashError::Schema {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let year = parse_int(&record[0], line, &year_column)?;
        let year = i32::try_from(year).map_err(|_| DashError::Parse {
            line,
            column: year_column.clone(),
            value: record[0].to_string(),
            expected: "year",
        })?;

        for (region, cell) in headers.iter().zip(record.iter()).skip(1) {
            let value = parse_int(cell, line, region)?;
            let metric = RegionMetric {
                region: region.to_string(),
                year,
                value,
            };
            let id = storage.insert(&metric)?;
            debug!(id, record = %metric, value, "inserted region metric");
            summary.records_inserted += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Query;

    const SAMPLE: &str = "\
年份,北京市,广西壮族自治区,新疆维吾尔自治区
2014,44489,15557,15097
2015,48458,16873,16859
";

    #[test]
    fn test_one_record_per_region_cell() {
        let storage = Storage::in_memory().unwrap();
        let summary = import_region_metrics(SAMPLE.as_bytes(), &storage).unwrap();
        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.records_inserted, 6);

        let rows: Vec<RegionMetric> = storage.query(&Query::year(2015)).unwrap();
        assert_eq!(
            rows,
            vec![
                RegionMetric {
                    region: "北京市".to_string(),
                    year: 2015,
                    value: 48458
                },
                RegionMetric {
                    region: "广西壮族自治区".to_string(),
                    year: 2015,
                    value: 16873
                },
                RegionMetric {
                    region: "新疆维吾尔自治区".to_string(),
                    year: 2015,
                    value: 16859
                },
            ]
        );
    }

    #[test]
    fn test_reimport_appends_duplicates() {
        let storage = Storage::in_memory().unwrap();
        import_region_metrics(SAMPLE.as_bytes(), &storage).unwrap();
        import_region_metrics(SAMPLE.as_bytes(), &storage).unwrap();
        assert_eq!(storage.count::<RegionMetric>().unwrap(), 12);
    }

    #[test]
    fn test_non_integer_value_is_parse_error() {
        let storage = Storage::in_memory().unwrap();
        let input = "年份,北京市,上海市\n2014,44489,45966.5\n";
        let err = import_region_metrics(input.as_bytes(), &storage).unwrap_err();
        match err {
            DashError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "上海市");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_year_is_parse_error() {
        let storage = Storage::in_memory().unwrap();
        let input = "年份,北京市\n2014年,44489\n";
        let err = import_region_metrics(input.as_bytes(), &storage).unwrap_err();
        assert!(matches!(err, DashError::Parse { .. }));
        assert_eq!(storage.count::<RegionMetric>().unwrap(), 0);
    }

    #[test]
    fn test_short_row_is_schema_error() {
        let storage = Storage::in_memory().unwrap();
        let input = "年份,北京市,上海市\n2014,44489\n";
        let err = import_region_metrics(input.as_bytes(), &storage).unwrap_err();
        assert!(matches!(
            err,
            DashError::Schema {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_failure_keeps_earlier_rows() {
        let storage = Storage::in_memory().unwrap();
        let input = "年份,北京市,上海市\n2014,44489,45966\n2015,bad,49867\n";
        assert!(import_region_metrics(input.as_bytes(), &storage).is_err());
        // First row committed, nothing from the failing row
        assert_eq!(storage.count::<RegionMetric>().unwrap(), 2);
    }
}
