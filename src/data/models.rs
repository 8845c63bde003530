//! Data models for the three imported survey tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity assigned by storage on insert
pub type RecordId = i64;

/// Per-capita disposable income of one region in one year
/// (source: `disposable_income_by_province.csv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMetric {
    pub region: String,
    pub year: i32,
    pub value: i64,
}

impl fmt::Display for RegionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.region, self.year)
    }
}

/// Cumulative national disposable income for one quarter, split into its
/// four components (source: `disposable_income_national.csv`).
///
/// `total` is taken from the source as-is; it is not checked against the
/// sum of the components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    /// Year and quarter label, e.g. `2014_Q1`
    pub period: String,
    pub total: i64,
    pub wage: i64,
    pub business: i64,
    pub property: i64,
    pub transfer: i64,
}

impl IncomeBreakdown {
    /// Component values in display order: wage, business, property, transfer
    pub fn components(&self) -> [i64; 4] {
        [self.wage, self.business, self.property, self.transfer]
    }
}

impl fmt::Display for IncomeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Total Income: {}", self.period, self.total)
    }
}

/// Gini coefficient and income growth rates for one quarter
/// (source: `income_and_inequality_metrics_national.csv`).
///
/// Growth rates are percentages; the coefficient lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSeries {
    pub period: String,
    pub gini: f64,
    pub disposable_growth: f64,
    pub median_disposable_growth: f64,
    pub wage_growth: f64,
    pub business_growth: f64,
    pub property_growth: f64,
    pub transfer_growth: f64,
}

impl fmt::Display for GrowthSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_labels() {
        let metric = RegionMetric {
            region: "广东省".to_string(),
            year: 2015,
            value: 27859,
        };
        assert_eq!(metric.to_string(), "广东省 - 2015");

        let income = IncomeBreakdown {
            period: "2014_Q1".to_string(),
            total: 5562,
            wage: 3150,
            business: 1040,
            property: 425,
            transfer: 947,
        };
        assert_eq!(income.to_string(), "2014_Q1 - Total Income: 5562");
        assert_eq!(income.components(), [3150, 1040, 425, 947]);
    }
}
