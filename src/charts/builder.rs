//! Parameterized bar/line overlay builder.
//!
//! Every axis chart in the catalog is the same recipe: project records onto
//! a key axis and some value axes, style each axis as a bar or line series,
//! then attach display options. `SeriesBuilder` captures that recipe once.

use super::types::{AxisChart, Chart, Series, SeriesKind, Title, ValueAxis};
use crate::reshape::{project, Field};

struct Layer {
    kind: SeriesKind,
    y_axis_index: usize,
}

pub struct SeriesBuilder<R> {
    title: Title,
    fields: Vec<Field<R>>,
    layers: Vec<Layer>,
    extra_axes: Vec<ValueAxis>,
    legend_bottom: Option<String>,
    cross_tooltip: bool,
    toolbox: bool,
}

impl<R> SeriesBuilder<R> {
    pub fn new(title: Title) -> Self {
        SeriesBuilder {
            title,
            fields: Vec::new(),
            layers: Vec::new(),
            extra_axes: Vec::new(),
            legend_bottom: None,
            cross_tooltip: false,
            toolbox: false,
        }
    }

    /// Add a value axis drawn with `kind` against value axis `y_axis_index`
    pub fn series(
        mut self,
        name: &'static str,
        get: fn(&R) -> f64,
        kind: SeriesKind,
        y_axis_index: usize,
    ) -> Self {
        self.fields.push(Field::new(name, get));
        self.layers.push(Layer { kind, y_axis_index });
        self
    }

    pub fn bar(self, name: &'static str, get: fn(&R) -> f64) -> Self {
        self.series(name, get, SeriesKind::Bar, 0)
    }

    pub fn line(self, name: &'static str, get: fn(&R) -> f64) -> Self {
        self.series(name, get, SeriesKind::Line, 0)
    }

    pub fn extend_axis(mut self, axis: ValueAxis) -> Self {
        self.extra_axes.push(axis);
        self
    }

    pub fn legend_bottom(mut self, position: impl Into<String>) -> Self {
        self.legend_bottom = Some(position.into());
        self
    }

    /// Axis-triggered tooltip with a cross pointer, plus the toolbox
    pub fn interactive(mut self) -> Self {
        self.cross_tooltip = true;
        self.toolbox = true;
        self
    }

    /// Build the chart from `records`, keyed by `key`.
    ///
    /// Returns `None` when `records` is empty.
    pub fn build(self, records: &[R], key: impl Fn(&R) -> String) -> Option<Chart> {
        let projected = project(records, key, &self.fields)?;

        let series = projected
            .axes
            .into_iter()
            .zip(self.layers)
            .map(|(axis, layer)| Series {
                name: axis.name,
                kind: layer.kind,
                y_axis_index: layer.y_axis_index,
                data: axis.values,
                show_labels: false,
            })
            .collect();

        Some(Chart::Axis(AxisChart {
            title: self.title,
            x_axis: projected.keys,
            series,
            extra_axes: self.extra_axes,
            legend_bottom: self.legend_bottom,
            cross_tooltip: self.cross_tooltip,
            toolbox: self.toolbox,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::IncomeBreakdown;

    fn income(period: &str, wage: i64, total: i64) -> IncomeBreakdown {
        IncomeBreakdown {
            period: period.to_string(),
            total,
            wage,
            business: 0,
            property: 0,
            transfer: 0,
        }
    }

    fn builder() -> SeriesBuilder<IncomeBreakdown> {
        SeriesBuilder::new(Title::new("income"))
            .bar("wage", |r: &IncomeBreakdown| r.wage as f64)
            .series("total", |r: &IncomeBreakdown| r.total as f64, SeriesKind::Line, 1)
            .extend_axis(ValueAxis::new("元").range(0.0, 40000.0))
            .interactive()
    }

    #[test]
    fn test_build_overlay() {
        let records = vec![income("2014_Q1", 3150, 5562), income("2014_Q2", 5399, 9532)];
        let chart = builder().build(&records, |r| r.period.clone()).unwrap();

        let Chart::Axis(axis) = chart else {
            panic!("expected an axis chart");
        };
        assert_eq!(axis.x_axis, ["2014_Q1", "2014_Q2"]);
        assert_eq!(axis.series.len(), 2);
        assert_eq!(axis.series[0].kind, SeriesKind::Bar);
        assert_eq!(axis.series[0].data, [3150.0, 5399.0]);
        assert_eq!(axis.series[1].kind, SeriesKind::Line);
        assert_eq!(axis.series[1].y_axis_index, 1);
        assert_eq!(axis.series[1].data, [5562.0, 9532.0]);
        assert_eq!(axis.extra_axes.len(), 1);
        assert!(axis.cross_tooltip && axis.toolbox);
    }

    #[test]
    fn test_build_empty_is_none() {
        assert!(builder().build(&[], |r| r.period.clone()).is_none());
    }
}
