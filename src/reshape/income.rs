//! Reshapes specific to the income composition table.

use std::collections::BTreeMap;

use serde::Serialize;

use super::NamedValue;
use crate::data::IncomeBreakdown;
use crate::error::{DashError, DashResult};

/// Labels of the four components followed by the stacked total
pub const COMPONENT_LABELS: [&str; 5] = ["工资收入", "经营收入", "财产收入", "转移收入", "总收入"];

/// Group income rows by period into name/value slices, periods sorted
/// lexicographically. The total comes first, then the four components.
/// A period seen twice keeps its last row.
pub fn group_by_period(records: &[IncomeBreakdown]) -> BTreeMap<String, Vec<NamedValue>> {
    records
        .iter()
        .map(|r| {
            let slices = vec![
                NamedValue::new(COMPONENT_LABELS[4], r.total),
                NamedValue::new(COMPONENT_LABELS[0], r.wage),
                NamedValue::new(COMPONENT_LABELS[1], r.business),
                NamedValue::new(COMPONENT_LABELS[2], r.property),
                NamedValue::new(COMPONENT_LABELS[3], r.transfer),
            ];
            (r.period.clone(), slices)
        })
        .collect()
}

/// One cell of the stacked component grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StackedCell {
    pub period_index: usize,
    pub component_index: usize,
    pub value: i64,
}

/// Running sums of the four components for each record, plus a fifth cell
/// repeating the final sum as the stacked total. A running sum outside the
/// `i64` range is an error.
pub fn stack_components(records: &[IncomeBreakdown]) -> DashResult<Vec<StackedCell>> {
    let mut cells = Vec::with_capacity(records.len() * COMPONENT_LABELS.len());
    for (period_index, record) in records.iter().enumerate() {
        let mut stacked: i64 = 0;
        for (component_index, value) in record.components().into_iter().enumerate() {
            stacked = stacked
                .checked_add(value)
                .ok_or(DashError::Overflow("income components"))?;
            cells.push(StackedCell {
                period_index,
                component_index,
                value: stacked,
            });
        }
        cells.push(StackedCell {
            period_index,
            component_index: 4,
            value: stacked,
        });
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income(period: &str, total: i64) -> IncomeBreakdown {
        IncomeBreakdown {
            period: period.to_string(),
            total,
            wage: 10,
            business: 20,
            property: 30,
            transfer: 40,
        }
    }

    #[test]
    fn test_group_by_period_sorted() {
        let records = vec![income("2015_Q1", 2), income("2014_Q3", 1), income("2014_Q1", 0)];
        let grouped = group_by_period(&records);

        let periods: Vec<&String> = grouped.keys().collect();
        assert_eq!(periods, ["2014_Q1", "2014_Q3", "2015_Q1"]);
        assert_eq!(grouped["2015_Q1"][0], NamedValue::new("总收入", 2));
        assert_eq!(grouped["2015_Q1"][1], NamedValue::new("工资收入", 10));
        assert_eq!(grouped["2015_Q1"].len(), 5);
    }

    #[test]
    fn test_group_by_period_last_row_wins() {
        let records = vec![income("2014_Q1", 1), income("2014_Q1", 9)];
        let grouped = group_by_period(&records);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["2014_Q1"][0].value, 9);
    }

    #[test]
    fn test_stack_components() {
        let records = vec![income("2014_Q1", 100), income("2014_Q2", 100)];
        let cells = stack_components(&records).unwrap();

        assert_eq!(cells.len(), 10);
        let values: Vec<i64> = cells[..5].iter().map(|c| c.value).collect();
        assert_eq!(values, [10, 30, 60, 100, 100]);
        assert_eq!(
            cells[5],
            StackedCell {
                period_index: 1,
                component_index: 0,
                value: 10
            }
        );
    }

    #[test]
    fn test_stack_components_overflow_is_an_error() {
        let mut record = income("2014_Q1", i64::MAX);
        record.wage = i64::MAX;
        record.business = 1;
        assert!(matches!(
            stack_components(&[record]),
            Err(DashError::Overflow("income components"))
        ));
    }
}
