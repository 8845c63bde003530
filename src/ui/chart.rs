//! Draws chart descriptions in the terminal.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart as AxisWidget, Dataset, Gauge,
        GraphType, LegendPosition, Paragraph, Wrap,
    },
    Frame,
};

use super::theme::Theme;
use crate::charts::types::{
    AxisChart, Bar3dChart, Chart, GaugeChart, MapChart, PieChart, SeriesKind, Title, TreeChart,
    ValueAxis,
};
use crate::reshape::TreeNode;

/// The chart to draw for a description, stepping into timeline frame
/// `frame_index` (clamped) when the description is a timeline.
pub fn current_frame(chart: &Chart, frame_index: usize) -> &Chart {
    match chart {
        Chart::Timeline(timeline) => match timeline.frames.len() {
            0 => chart,
            n => &timeline.frames[frame_index.min(n - 1)].chart,
        },
        other => other,
    }
}

/// Chart panel widget
pub struct ChartView<'a> {
    chart: &'a Chart,
    fallback_title: &'a str,
    theme: &'a Theme,
}

impl<'a> ChartView<'a> {
    pub fn new(chart: &'a Chart, fallback_title: &'a str, theme: &'a Theme) -> Self {
        ChartView {
            chart,
            fallback_title,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = self.block(self.chart.title(), focused);
        match self.chart {
            Chart::Axis(chart) => self.render_axis(frame, area, block, chart),
            Chart::Pie(chart) => self.render_pie(frame, area, block, chart),
            Chart::Gauge(chart) => self.render_gauge(frame, area, block, chart),
            Chart::Map(chart) => self.render_map(frame, area, block, chart),
            Chart::Tree(chart) => self.render_tree(frame, area, block, chart),
            Chart::Bar3d(chart) => self.render_stacked(frame, area, block, chart),
            // A timeline with no frames
            Chart::Timeline(_) => self.render_empty(frame, area, block, "No frames"),
            Chart::NoData { message } => self.render_empty(frame, area, block, message),
        }
    }

    fn block(&self, title: Option<&Title>, focused: bool) -> Block<'a> {
        let (border_style, title_style) = self.theme.panel_styles(focused);
        let text = title.map(|t| t.text.as_str()).unwrap_or(self.fallback_title);
        let mut block = Block::default()
            .title(format!(" {text} "))
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(title_style)
            .style(self.theme.surface_style());
        if let Some(title) = title {
            if title.left.as_deref() == Some("center") {
                block = block.title_alignment(Alignment::Center);
            }
            if let Some(subtitle) = &title.subtitle {
                block = block.title_bottom(Line::styled(
                    format!(" {subtitle} "),
                    self.theme.dimmed_style(),
                ));
            }
        }
        block
    }

    fn render_axis(&self, frame: &mut Frame, area: Rect, block: Block, chart: &AxisChart) {
        let categories = chart.x_axis.len();
        let primary = bounds(
            chart
                .series
                .iter()
                .filter(|s| s.y_axis_index == 0)
                .flat_map(|s| s.data.iter().copied()),
            None,
        );

        let bar_count = chart.series.iter().filter(|s| s.kind == SeriesKind::Bar).count();
        let mut bar_slot = 0;

        // Secondary axes are drawn rescaled onto the primary range
        let points: Vec<Vec<(f64, f64)>> = chart
            .series
            .iter()
            .map(|series| {
                let scale = match series.y_axis_index {
                    0 => None,
                    i => Some(bounds(series.data.iter().copied(), chart.extra_axes.get(i - 1))),
                };
                let offset = match series.kind {
                    SeriesKind::Bar => {
                        let offset = bar_offset(bar_slot, bar_count);
                        bar_slot += 1;
                        offset
                    }
                    SeriesKind::Line => 0.0,
                };
                series
                    .data
                    .iter()
                    .enumerate()
                    .map(|(x, y)| {
                        let y = match scale {
                            Some(from) => rescale(*y, from, primary),
                            None => *y,
                        };
                        (x as f64 + offset, y)
                    })
                    .collect()
            })
            .collect();

        let datasets: Vec<Dataset> = chart
            .series
            .iter()
            .zip(points.iter())
            .enumerate()
            .map(|(i, (series, data))| {
                let name = match series.y_axis_index {
                    0 => series.name.clone(),
                    i => match chart.extra_axes.get(i - 1) {
                        Some(axis) => format!("{} ({})", series.name, axis.name),
                        None => series.name.clone(),
                    },
                };
                let graph_type = match series.kind {
                    SeriesKind::Bar => GraphType::Bar,
                    SeriesKind::Line => GraphType::Line,
                };
                Dataset::default()
                    .name(name)
                    .marker(Marker::Braille)
                    .graph_type(graph_type)
                    .style(Style::default().fg(self.theme.chart_color(i)))
                    .data(data)
            })
            .collect();

        let x_labels: Vec<Span> = match categories {
            0 => Vec::new(),
            1 => vec![Span::raw(chart.x_axis[0].clone())],
            n => vec![
                Span::raw(chart.x_axis[0].clone()),
                Span::raw(chart.x_axis[n / 2].clone()),
                Span::raw(chart.x_axis[n - 1].clone()),
            ],
        };
        let y_labels = vec![
            Span::raw(format_value(primary.0)),
            Span::raw(format_value((primary.0 + primary.1) / 2.0)),
            Span::raw(format_value(primary.1)),
        ];

        let mut block = block;
        if let Some(axis) = chart.extra_axes.first() {
            let (min, max) = bounds(std::iter::empty(), Some(axis));
            block = block.title_bottom(
                Line::styled(
                    format!(
                        " {}: {} .. {} ",
                        axis.name,
                        axis_label(axis, min),
                        axis_label(axis, max)
                    ),
                    self.theme.dimmed_style(),
                )
                .right_aligned(),
            );
        }

        let legend = if chart.legend_bottom.is_some() {
            LegendPosition::Bottom
        } else {
            LegendPosition::TopRight
        };

        let widget = AxisWidget::new(datasets)
            .block(block)
            .legend_position(Some(legend))
            .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 2)))
            .x_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds([-0.5, categories.max(1) as f64 - 0.5])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds([primary.0, primary.1])
                    .labels(y_labels),
            );

        frame.render_widget(widget, area);
    }

    fn render_pie(&self, frame: &mut Frame, area: Rect, block: Block, chart: &PieChart) {
        let total: i64 = chart.data.iter().map(|d| d.value.max(0)).sum();
        let bars: Vec<Bar> = chart
            .data
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                let share = if total > 0 {
                    slice.value.max(0) as f64 * 100.0 / total as f64
                } else {
                    0.0
                };
                Bar::default()
                    .value(slice.value.max(0) as u64)
                    .label(Line::from(slice.name.clone()))
                    .text_value(format!("{} ({share:.1}%)", slice.value))
                    .style(Style::default().fg(self.theme.chart_color(i)))
            })
            .collect();

        frame.render_widget(horizontal_bars(block, &bars), area);
    }

    fn render_map(&self, frame: &mut Frame, area: Rect, block: Block, chart: &MapChart) {
        let mut regions: Vec<_> = chart.data.iter().collect();
        regions.sort_by(|a, b| b.value.cmp(&a.value));

        let bars: Vec<Bar> = regions
            .iter()
            .map(|region| {
                let (piece, color_index) = match chart.piece_for(region.value) {
                    Some(piece) => (
                        piece.label.as_str(),
                        chart.pieces.iter().position(|p| p == piece).unwrap_or(0),
                    ),
                    None => ("", 0),
                };
                Bar::default()
                    .value(region.value.max(0) as u64)
                    .label(Line::from(region.name.clone()))
                    .text_value(format!("{} [{piece}]", region.value))
                    .style(Style::default().fg(self.theme.chart_color(color_index)))
            })
            .collect();

        frame.render_widget(horizontal_bars(block, &bars), area);
    }

    fn render_gauge(&self, frame: &mut Frame, area: Rect, block: Block, chart: &GaugeChart) {
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let gauge = Gauge::default()
            .block(Block::default().title(format!(" {} ", chart.name)).borders(Borders::ALL))
            .gauge_style(Style::default().fg(self.theme.chart_color(0)))
            .ratio(chart.ratio())
            .label(chart.formatted_value());
        frame.render_widget(gauge, rows[1]);

        let range = Paragraph::new(format!(
            "{:.*} .. {:.*}",
            chart.precision, chart.min, chart.precision, chart.max
        ))
        .style(self.theme.dimmed_style())
        .alignment(Alignment::Center);
        frame.render_widget(range, rows[2]);
    }

    fn render_tree(&self, frame: &mut Frame, area: Rect, block: Block, chart: &TreeChart) {
        let mut lines = Vec::new();
        self.push_tree_lines(&chart.root, 0, &mut lines);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn push_tree_lines(&self, node: &TreeNode, depth: usize, lines: &mut Vec<Line<'a>>) {
        let style = match depth {
            0 => self.theme.title_style(),
            1 => Style::default().add_modifier(Modifier::BOLD),
            _ => self.theme.normal_style(),
        };
        let marker = if node.children.is_empty() { "- " } else { "+ " };
        lines.push(Line::styled(
            format!("{}{marker}{}", "  ".repeat(depth), node.name),
            style,
        ));
        for child in &node.children {
            self.push_tree_lines(child, depth + 1, lines);
        }
    }

    fn render_stacked(&self, frame: &mut Frame, area: Rect, block: Block, chart: &Bar3dChart) {
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(inner);

        let legend: Vec<Span> = chart
            .y_categories
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Span::styled(format!("■ {name}  "), Style::default().fg(self.theme.chart_color(i)))
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(legend)), rows[0]);

        let mut bar_chart = BarChart::default().bar_width(1).bar_gap(0).group_gap(2);
        for (x, period) in chart.x_categories.iter().enumerate() {
            let bars: Vec<Bar> = chart
                .cells
                .iter()
                .filter(|c| c.period_index == x)
                .map(|c| {
                    Bar::default()
                        .value(c.value.max(0) as u64)
                        .text_value(String::new())
                        .style(Style::default().fg(self.theme.chart_color(c.component_index)))
                })
                .collect();
            bar_chart = bar_chart.data(
                BarGroup::default()
                    .label(Line::from(period.clone()))
                    .bars(&bars),
            );
        }
        frame.render_widget(bar_chart, rows[1]);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect, block: Block, message: &str) {
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let message = Paragraph::new(message.to_string())
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);

        frame.render_widget(message, inner);
    }
}

fn horizontal_bars<'b>(block: Block<'b>, bars: &[Bar<'b>]) -> BarChart<'b> {
    BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(bars))
}

/// Value range for an axis: its configured bounds where set, otherwise the
/// data range widened to include zero. Never returns an empty range.
fn bounds(values: impl Iterator<Item = f64>, axis: Option<&ValueAxis>) -> (f64, f64) {
    let (mut min, mut max) = values.fold((0.0f64, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max == f64::MIN {
        max = 1.0;
    }
    if let Some(axis) = axis {
        min = axis.min.unwrap_or(min);
        max = axis.max.unwrap_or(max);
    }
    if min >= max {
        max = min + 1.0;
    }
    (min, max)
}

fn rescale(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    to.0 + (value - from.0) / (from.1 - from.0) * (to.1 - to.0)
}

/// Horizontal offset of bar series `slot` so grouped bars sit side by side
fn bar_offset(slot: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    let width = 0.6;
    -width / 2.0 + width * slot as f64 / (count - 1) as f64
}

fn axis_label(axis: &ValueAxis, value: f64) -> String {
    axis.label_format.replace("{value}", &format_value(value))
}

/// Format a value for display on axis labels
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{value:.0}")
    } else if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::types::{Timeline, TimelineFrame};

    fn placeholder(message: &str) -> Chart {
        Chart::NoData {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_current_frame_clamps_index() {
        let chart = Chart::Timeline(Timeline {
            frames: vec![
                TimelineFrame {
                    time_point: "2014".to_string(),
                    chart: placeholder("a"),
                },
                TimelineFrame {
                    time_point: "2015".to_string(),
                    chart: placeholder("b"),
                },
            ],
            play_interval_ms: 1000,
            auto_play: false,
        });
        assert_eq!(current_frame(&chart, 1), &placeholder("b"));
        assert_eq!(current_frame(&chart, 9), &placeholder("b"));

        let plain = placeholder("c");
        assert_eq!(current_frame(&plain, 3), &plain);
    }

    #[test]
    fn test_bounds_prefer_axis_range() {
        assert_eq!(bounds([3.0, 8.0].into_iter(), None), (0.0, 8.0));
        assert_eq!(bounds([-2.0, 8.0].into_iter(), None), (-2.0, 8.0));
        assert_eq!(bounds(std::iter::empty(), None), (0.0, 1.0));

        let axis = ValueAxis::new("增长率").range(-10.0, 20.0);
        assert_eq!(bounds([3.0].into_iter(), Some(&axis)), (-10.0, 20.0));
    }

    #[test]
    fn test_rescale_maps_secondary_onto_primary() {
        assert_eq!(rescale(5.0, (-10.0, 20.0), (0.0, 300.0)), 150.0);
        assert_eq!(rescale(-10.0, (-10.0, 20.0), (0.0, 300.0)), 0.0);
    }

    #[test]
    fn test_bar_offsets_are_centered() {
        assert_eq!(bar_offset(0, 1), 0.0);
        assert!((bar_offset(0, 4) + 0.3).abs() < 1e-9);
        assert!((bar_offset(3, 4) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_axis_label_uses_format() {
        let axis = ValueAxis::new("增长率").label_format("{value}%");
        assert_eq!(axis_label(&axis, -10.0), "-10%");
        let yuan = ValueAxis::new("元").label_format("{value}￥");
        assert_eq!(axis_label(&yuan, 40000.0), "40000￥");
    }
}
