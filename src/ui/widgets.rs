//! Sidebar and status bar widgets for the dashboard.

use chrono::{DateTime, Datelike, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::charts::ChartEntry;

/// First survey year shown in the footer
const FIRST_YEAR: i32 = 2014;

/// Chart catalog panel widget
pub struct CatalogList<'a> {
    entries: &'a [&'a ChartEntry],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> CatalogList<'a> {
    pub fn new(entries: &'a [&'a ChartEntry], selected: usize, theme: &'a Theme) -> Self {
        CatalogList {
            entries,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let mut previous_catalog = None;
        let mut items = Vec::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            // Catalog number only on the first entry of each group
            let group = if previous_catalog == Some(entry.catalog) {
                "  ".to_string()
            } else {
                format!("{} ", entry.catalog)
            };
            previous_catalog = Some(entry.catalog);
            items.push(ListItem::new(Line::from(vec![
                Span::styled(group, self.theme.dimmed_style()),
                Span::raw(format!("{} {}", i + 1, entry.name)),
            ])));
        }

        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(format!(" Charts ({}) ", self.entries.len()))
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(border_style)
            .title_style(title_style);

        let list = List::new(items)
            .block(block)
            .style(self.theme.normal_style())
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    chart: Option<&'a ChartEntry>,
    refreshed_at: DateTime<Local>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        chart: Option<&'a ChartEntry>,
        refreshed_at: DateTime<Local>,
        error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        StatusBar {
            chart,
            refreshed_at,
            error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(e) = self.error {
            Line::styled(format!("Error: {e}"), self.theme.error_style())
        } else {
            let chart = self
                .chart
                .map(|c| format!("{} | ", c.title))
                .unwrap_or_default();
            Line::from(vec![
                Span::raw(format!("income-charts: {chart}[h] Help [q] Quit")),
                Span::styled(
                    format!(
                        "  refreshed {}  {}",
                        self.refreshed_at.format("%H:%M:%S"),
                        copyright(self.refreshed_at.year())
                    ),
                    self.theme.dimmed_style(),
                ),
            ])
        };

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(self.theme.border_style()),
        );

        frame.render_widget(paragraph, area);
    }
}

/// Footer copyright covering the survey years up to `current_year`
fn copyright(current_year: i32) -> String {
    format!("© {FIRST_YEAR}-{}", current_year.max(FIRST_YEAR))
}
