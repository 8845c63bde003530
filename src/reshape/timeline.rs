//! Per-period slicing for timeline-animated charts.

/// The records belonging to one period of a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<R> {
    pub period: String,
    pub records: Vec<R>,
}

/// Split `records` into one frame per period, in `periods` order.
///
/// A record joins every period for which `belongs(record, period)` holds.
/// Periods without any matching record produce no frame at all.
pub fn slice_by_period<R, P>(
    periods: impl IntoIterator<Item = P>,
    records: &[R],
    belongs: impl Fn(&R, &str) -> bool,
) -> Vec<Frame<R>>
where
    R: Clone,
    P: ToString,
{
    periods
        .into_iter()
        .filter_map(|period| {
            let period = period.to_string();
            let matching: Vec<R> = records
                .iter()
                .filter(|&r| belongs(r, &period))
                .cloned()
                .collect();
            if matching.is_empty() {
                None
            } else {
                Some(Frame {
                    period,
                    records: matching,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RegionMetric;

    fn metric(region: &str, year: i32) -> RegionMetric {
        RegionMetric {
            region: region.to_string(),
            year,
            value: 1000,
        }
    }

    #[test]
    fn test_empty_periods_are_omitted() {
        let records = vec![metric("北京市", 2015), metric("上海市", 2018), metric("天津市", 2015)];
        let frames = slice_by_period(2014..=2021, &records, |r, p| r.year.to_string() == p);

        let labels: Vec<&str> = frames.iter().map(|f| f.period.as_str()).collect();
        assert_eq!(labels, ["2015", "2018"]);
        assert_eq!(frames[0].records.len(), 2);
        assert_eq!(frames[1].records, vec![metric("上海市", 2018)]);
    }

    #[test]
    fn test_prefix_matching_periods() {
        let quarters = ["2014_Q1", "2014_Q2", "2016_Q1"];
        let frames = slice_by_period(2014..=2016, &quarters, |q, p| q.starts_with(p));
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].records, ["2014_Q1", "2014_Q2"]);
        assert_eq!(frames[1].period, "2016");
    }

    #[test]
    fn test_no_records_no_frames() {
        let records: Vec<RegionMetric> = Vec::new();
        assert!(slice_by_period(2014..=2021, &records, |_, _| true).is_empty());
    }
}
