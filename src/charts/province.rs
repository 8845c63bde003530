//! Charts over the per-province table, one timeline frame per survey year.

use super::builder::SeriesBuilder;
use super::types::{Chart, MapChart, Timeline, TimelineFrame, Title, TreeChart, VisualPiece};
use super::{SOURCE_NOTE, SURVEY_YEARS};
use crate::data::{Query, Record, RegionMetric, Storage};
use crate::error::{DashError, DashResult};
use crate::reshape::{aggregate_by_area, build_area_tree, slice_by_period, AreaTotal, Frame, NamedValue};

/// Piecewise color bands for the income map, highest first
const MAP_PIECES: [(i64, i64, &str); 18] = [
    (100000, 1000000, "100,000-1,000,000"),
    (80000, 100000, "80,000-100,000"),
    (75000, 79999, "75,000-79,999"),
    (70000, 74999, "70,000-74,999"),
    (65000, 69999, "65,000-69,999"),
    (60000, 64999, "60,000-64,999"),
    (55000, 59999, "55,000-59,999"),
    (50000, 54999, "50,000-54,999"),
    (45000, 49999, "45,000-49,999"),
    (40000, 44999, "40,000-44,999"),
    (35000, 39999, "35,000-39,999"),
    (30000, 34999, "30,000-34,999"),
    (25000, 29999, "25,000-29,999"),
    (20000, 24999, "20,000-24,999"),
    (15000, 19999, "15,000-19,999"),
    (10000, 14999, "10,000-14,999"),
    (5000, 9999, "5,000-9,999"),
    (0, 4999, "0-4,999"),
];

/// Region rows split into one frame per survey year that has data
fn yearly_frames(storage: &Storage) -> DashResult<Vec<Frame<RegionMetric>>> {
    let rows: Vec<RegionMetric> = storage.query(&Query::all())?;
    let frames = slice_by_period(SURVEY_YEARS, &rows, |r, year| r.year.to_string() == year);
    if frames.is_empty() {
        return Err(DashError::EmptyResult(RegionMetric::ENTITY));
    }
    Ok(frames)
}

fn region_values(records: &[RegionMetric]) -> Vec<NamedValue> {
    records
        .iter()
        .map(|r| NamedValue::new(r.region.clone(), r.value))
        .collect()
}

fn timeline(frames: Vec<TimelineFrame>) -> Chart {
    Chart::Timeline(Timeline {
        frames,
        play_interval_ms: 1000,
        auto_play: false,
    })
}

/// Choropleth of provincial income per year
pub fn province_map_timeline(storage: &Storage) -> DashResult<Chart> {
    let pieces: Vec<VisualPiece> = MAP_PIECES
        .iter()
        .map(|(min, max, label)| VisualPiece {
            min: *min,
            max: *max,
            label: label.to_string(),
        })
        .collect();

    let frames = yearly_frames(storage)?
        .into_iter()
        .map(|frame| TimelineFrame {
            time_point: format!("{}年", frame.period),
            chart: Chart::Map(MapChart {
                title: Title::new(format!("{}年全国各省份居民人均可支配收入", frame.period))
                    .subtitle(SOURCE_NOTE),
                map_type: "china".to_string(),
                data: region_values(&frame.records),
                pieces: pieces.clone(),
            }),
        })
        .collect();

    Ok(timeline(frames))
}

/// Country → area → province tree per year
pub fn province_tree_timeline(storage: &Storage) -> DashResult<Chart> {
    let frames = yearly_frames(storage)?
        .into_iter()
        .map(|frame| TimelineFrame {
            time_point: format!("{}年", frame.period),
            chart: Chart::Tree(TreeChart {
                title: Title::new(format!("Tree for Year {}", frame.period)),
                root: build_area_tree(&region_values(&frame.records)),
                collapse_interval: 2,
            }),
        })
        .collect();

    Ok(timeline(frames))
}

/// Sum of provincial income per macro-area per year
pub fn area_totals_timeline(storage: &Storage) -> DashResult<Chart> {
    let mut frames = Vec::new();
    for frame in yearly_frames(storage)? {
        let totals = aggregate_by_area(&region_values(&frame.records))?;
        let chart = SeriesBuilder::new(
            Title::new(format!("{}年各大区居民人均可支配收入合计", frame.period)).subtitle(SOURCE_NOTE),
        )
        .bar("人均可支配收入合计", |t: &AreaTotal| t.total as f64)
        .build(&totals, |t| t.area.to_string());

        if let Some(chart) = chart {
            frames.push(TimelineFrame {
                time_point: format!("{}年", frame.period),
                chart,
            });
        }
    }

    Ok(timeline(frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::import_region_metrics;

    const REGION_CSV: &str = "\
年份,北京市,江苏省,浙江省,广东省,广西壮族自治区,火星
2015,48458,29539,35537,27859,16873,1
2018,62361,38096,45840,35810,21485,1
";

    fn storage_with_regions() -> Storage {
        let storage = Storage::in_memory().unwrap();
        import_region_metrics(REGION_CSV.as_bytes(), &storage).unwrap();
        storage
    }

    fn time_points(chart: &Chart) -> Vec<String> {
        match chart {
            Chart::Timeline(t) => t.frames.iter().map(|f| f.time_point.clone()).collect(),
            other => panic!("expected a timeline, got {other:?}"),
        }
    }

    #[test]
    fn test_only_years_with_data_get_frames() {
        let storage = storage_with_regions();
        let chart = province_map_timeline(&storage).unwrap();
        assert_eq!(time_points(&chart), ["2015年", "2018年"]);
    }

    #[test]
    fn test_map_frame_contents() {
        let storage = storage_with_regions();
        let Chart::Timeline(timeline) = province_map_timeline(&storage).unwrap() else {
            panic!("expected a timeline");
        };
        let Chart::Map(map) = &timeline.frames[0].chart else {
            panic!("expected a map");
        };
        assert_eq!(map.data.len(), 6);
        assert_eq!(map.data[0], NamedValue::new("北京市", 48458));
        assert_eq!(map.pieces.len(), 18);
        assert_eq!(map.piece_for(48458).unwrap().label, "45,000-49,999");
    }

    #[test]
    fn test_tree_frames_group_by_area() {
        let storage = storage_with_regions();
        let Chart::Timeline(timeline) = province_tree_timeline(&storage).unwrap() else {
            panic!("expected a timeline");
        };
        let Chart::Tree(tree) = &timeline.frames[1].chart else {
            panic!("expected a tree");
        };
        assert_eq!(tree.title.text, "Tree for Year 2018");
        let east = &tree.root.children[0];
        assert_eq!(east.name, "华东");
        let labels: Vec<&str> = east.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(labels, ["江苏省 (38096)", "浙江省 (45840)"]);
    }

    #[test]
    fn test_area_totals() {
        let storage = storage_with_regions();
        let Chart::Timeline(timeline) = area_totals_timeline(&storage).unwrap() else {
            panic!("expected a timeline");
        };
        let Chart::Axis(chart) = &timeline.frames[0].chart else {
            panic!("expected an axis chart");
        };
        assert_eq!(chart.x_axis[0], "华东");
        assert_eq!(chart.series[0].data[0], (29539 + 35537) as f64);
        assert_eq!(chart.series[0].data[1], (27859 + 16873) as f64);
        // The unmatched region is in no total
        let sum: f64 = chart.series[0].data.iter().sum();
        assert_eq!(sum, (48458 + 29539 + 35537 + 27859 + 16873) as f64);
    }

    #[test]
    fn test_empty_region_table() {
        let storage = Storage::in_memory().unwrap();
        assert!(matches!(
            province_tree_timeline(&storage),
            Err(DashError::EmptyResult(_))
        ));
    }
}
