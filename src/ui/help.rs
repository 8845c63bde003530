//! Help overlay: keyboard shortcuts beside the chart catalog.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::theme::Theme;
use crate::charts::ChartEntry;

const SHORTCUTS: [(&str, &str); 11] = [
    ("j / ↓", "Next chart"),
    ("k / ↑", "Previous chart"),
    ("1-9", "Open chart by number"),
    ("Enter / l", "Focus the chart"),
    ("Tab", "Switch panel focus"),
    ("← → / [ ]", "Previous / next time point"),
    ("Space", "Play or pause the timeline"),
    ("Esc", "Back to the catalog"),
    ("r", "Refresh data"),
    ("h / ? / F1", "Toggle this help"),
    ("q", "Quit"),
];

/// Help overlay listing shortcuts and every registered chart
pub struct HelpOverlay<'a> {
    entries: &'a [&'a ChartEntry],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(entries: &'a [&'a ChartEntry], selected: usize, theme: &'a Theme) -> Self {
        HelpOverlay {
            entries,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = popup_area(area, 85, 85);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" income-charts Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style())
            .style(self.theme.surface_style());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [keys_area, catalog_area] =
            Layout::horizontal([Constraint::Length(44), Constraint::Min(20)])
                .spacing(1)
                .areas(inner);

        let rows = SHORTCUTS.iter().map(|(key, action)| {
            Row::new([
                Cell::from(Span::styled(*key, Style::default().fg(self.theme.title))),
                Cell::from(*action),
            ])
        });
        let keys = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
            .header(
                Row::new(["Key", "Action"])
                    .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)),
            )
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(self.theme.border_style()),
            );
        frame.render_widget(keys, keys_area);

        let catalog = Paragraph::new(catalog_lines(self.entries, self.selected, self.theme))
            .wrap(Wrap { trim: false });
        frame.render_widget(catalog, catalog_area);
    }
}

/// Catalog grouped by section, each chart followed by its description
fn catalog_lines(entries: &[&ChartEntry], selected: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut group = None;
    for (i, entry) in entries.iter().enumerate() {
        if group != Some(entry.catalog) {
            if group.is_some() {
                lines.push(Line::default());
            }
            lines.push(Line::styled(
                format!("Catalog {}", entry.catalog),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
            group = Some(entry.catalog);
        }

        let name_style = if i == selected {
            theme.highlight_style()
        } else {
            theme.title_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} {}", i + 1, entry.name), name_style),
            Span::raw(format!("  {}", entry.title)),
        ]));
        lines.push(Line::styled(
            format!("    {}", entry.description),
            theme.dimmed_style(),
        ));
    }
    lines
}

/// `percent_x` by `percent_y` of `area`, centered
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
