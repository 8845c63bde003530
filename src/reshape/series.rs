//! Flat series projection: records to parallel key/value arrays.

use serde::Serialize;

/// A named numeric accessor over a record type
pub struct Field<R> {
    pub name: &'static str,
    pub get: fn(&R) -> f64,
}

impl<R> Field<R> {
    pub const fn new(name: &'static str, get: fn(&R) -> f64) -> Self {
        Field { name, get }
    }
}

/// One value axis of a projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAxis {
    pub name: String,
    pub values: Vec<f64>,
}

/// Parallel arrays: one key per record and one value axis per field,
/// all of the same length and in record order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatSeries {
    pub keys: Vec<String>,
    pub axes: Vec<NamedAxis>,
}

impl FlatSeries {
    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Values of the axis projected from the field called `name`
    #[allow(dead_code)] // Used in tests
    pub fn axis(&self, name: &str) -> Option<&[f64]> {
        self.axes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.values.as_slice())
    }
}

/// Project `records` onto a key axis and one value axis per field.
///
/// Returns `None` when there are no records; callers treat that as the
/// "no data" outcome rather than drawing empty axes.
pub fn project<R>(
    records: &[R],
    key: impl Fn(&R) -> String,
    fields: &[Field<R>],
) -> Option<FlatSeries> {
    if records.is_empty() {
        return None;
    }

    let keys = records.iter().map(&key).collect();
    let axes = fields
        .iter()
        .map(|field| NamedAxis {
            name: field.name.to_string(),
            values: records.iter().map(field.get).collect(),
        })
        .collect();

    Some(FlatSeries { keys, axes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GrowthSeries;

    fn growth(period: &str, wage: f64) -> GrowthSeries {
        GrowthSeries {
            period: period.to_string(),
            gini: 0.465,
            disposable_growth: wage + 1.0,
            median_disposable_growth: 0.0,
            wage_growth: wage,
            business_growth: 0.0,
            property_growth: 0.0,
            transfer_growth: 0.0,
        }
    }

    fn fields() -> [Field<GrowthSeries>; 2] {
        [
            Field::new("wage", |g: &GrowthSeries| g.wage_growth),
            Field::new("disposable", |g: &GrowthSeries| g.disposable_growth),
        ]
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let records: Vec<GrowthSeries> = Vec::new();
        assert!(project(&records, |g| g.period.clone(), &fields()).is_none());
    }

    #[test]
    fn test_parallel_arrays_in_input_order() {
        let records = vec![growth("2016_Q1", 3.0), growth("2014_Q1", 1.0), growth("2015_Q1", 2.0)];
        let series = project(&records, |g| g.period.clone(), &fields()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.keys, ["2016_Q1", "2014_Q1", "2015_Q1"]);
        assert_eq!(series.axes.len(), 2);
        assert_eq!(series.axis("wage").unwrap(), [3.0, 1.0, 2.0]);
        assert_eq!(series.axis("disposable").unwrap(), [4.0, 2.0, 3.0]);
        assert!(series.axis("missing").is_none());
    }
}
