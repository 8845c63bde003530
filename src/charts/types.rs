//! Declarative chart descriptions handed to a renderer.
//!
//! These types only describe what to draw. They serialize to JSON for
//! external renderers and are drawn directly by the terminal dashboard.

use serde::Serialize;

use crate::reshape::{NamedValue, StackedCell, TreeNode};

/// A renderer-ready chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    Axis(AxisChart),
    Pie(PieChart),
    Gauge(GaugeChart),
    Map(MapChart),
    Tree(TreeChart),
    Bar3d(Bar3dChart),
    Timeline(Timeline),
    /// Placeholder shown instead of a chart whose query found nothing
    NoData { message: String },
}

impl Chart {
    pub fn title(&self) -> Option<&Title> {
        match self {
            Chart::Axis(c) => Some(&c.title),
            Chart::Pie(c) => Some(&c.title),
            Chart::Gauge(c) => Some(&c.title),
            Chart::Map(c) => Some(&c.title),
            Chart::Tree(c) => Some(&c.title),
            Chart::Bar3d(c) => Some(&c.title),
            Chart::Timeline(t) => t.frames.first().and_then(|f| f.chart.title()),
            Chart::NoData { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Title {
            text: text.into(),
            subtitle: None,
            left: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn centered(mut self) -> Self {
        self.left = Some("center".to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Bar,
    Line,
}

/// One named data series drawn against the shared category axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    /// 0 is the primary value axis, 1 the first extended axis
    pub y_axis_index: usize,
    pub data: Vec<f64>,
    pub show_labels: bool,
}

/// An additional value axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Label template, `{value}` is replaced by the tick value
    pub label_format: String,
}

impl ValueAxis {
    pub fn new(name: impl Into<String>) -> Self {
        ValueAxis {
            name: name.into(),
            min: None,
            max: None,
            interval: None,
            position: None,
            label_format: "{value}".to_string(),
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn interval(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn right(mut self) -> Self {
        self.position = Some("right".to_string());
        self
    }

    pub fn label_format(mut self, format: impl Into<String>) -> Self {
        self.label_format = format.into();
        self
    }
}

/// Bar/line overlay over a category axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisChart {
    pub title: Title,
    pub x_axis: Vec<String>,
    pub series: Vec<Series>,
    pub extra_axes: Vec<ValueAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_bottom: Option<String>,
    /// Axis-triggered tooltip with a cross pointer
    pub cross_tooltip: bool,
    pub toolbox: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: Title,
    pub data: Vec<NamedValue>,
    /// Inner and outer radius, e.g. `["20%", "40%"]`
    pub radius: [String; 2],
    pub label_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeChart {
    pub title: Title,
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Value rendered with this many decimals
    pub precision: usize,
}

impl GaugeChart {
    /// Position of `value` between `min` and `max`, clamped to `[0, 1]`
    pub fn ratio(&self) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((self.value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn formatted_value(&self) -> String {
        format!("{:.*}", self.precision, self.value)
    }
}

/// One band of a piecewise color scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualPiece {
    pub min: i64,
    pub max: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapChart {
    pub title: Title,
    pub map_type: String,
    pub data: Vec<NamedValue>,
    pub pieces: Vec<VisualPiece>,
}

impl MapChart {
    /// Label of the color band containing `value`
    pub fn piece_for(&self, value: i64) -> Option<&VisualPiece> {
        self.pieces
            .iter()
            .find(|p| value >= p.min && value <= p.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeChart {
    pub title: Title,
    pub root: TreeNode,
    pub collapse_interval: usize,
}

/// Stacked bars over a period x category grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar3dChart {
    pub title: Title,
    pub x_categories: Vec<String>,
    pub y_categories: Vec<String>,
    pub cells: Vec<StackedCell>,
}

/// A sequence of charts scrubbed through by time point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub frames: Vec<TimelineFrame>,
    pub play_interval_ms: u64,
    pub auto_play: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    pub time_point: String,
    pub chart: Chart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_ratio_and_format() {
        let gauge = GaugeChart {
            title: Title::new("2015年"),
            name: "基尼系数".to_string(),
            value: 0.465,
            min: 0.46,
            max: 0.47,
            precision: 3,
        };
        assert!((gauge.ratio() - 0.5).abs() < 1e-9);
        assert_eq!(gauge.formatted_value(), "0.465");

        let out_of_range = GaugeChart { value: 0.5, ..gauge };
        assert_eq!(out_of_range.ratio(), 1.0);
    }

    #[test]
    fn test_chart_serializes_with_type_tag() {
        let chart = Chart::NoData {
            message: "no growth series rows found".to_string(),
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "no_data");
        assert_eq!(json["message"], "no growth series rows found");

        let pie = Chart::Pie(PieChart {
            title: Title::new("pie").centered(),
            data: vec![NamedValue::new("总收入", 5562)],
            radius: ["20%".to_string(), "40%".to_string()],
            label_format: "{b}: {c}".to_string(),
        });
        let json = serde_json::to_value(&pie).unwrap();
        assert_eq!(json["type"], "pie");
        assert_eq!(json["title"]["left"], "center");
        assert!(json["title"].get("subtitle").is_none());
        assert_eq!(json["data"][0]["value"], 5562);
    }
}
