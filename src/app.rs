//! Main application logic and TUI event loop.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{debug, info};

use crate::charts::{Chart, ChartEntry, ChartRegistry};
use crate::cli::AppConfig;
use crate::data::Storage;
use crate::ui::{
    chart::{current_frame, ChartView},
    timeline::{TimelineBar, TimelineState},
    widgets::{CatalogList, StatusBar},
    HelpOverlay, Theme,
};

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Catalog,
    Chart,
}

impl FocusedPanel {
    fn toggle(self) -> Self {
        match self {
            FocusedPanel::Catalog => FocusedPanel::Chart,
            FocusedPanel::Chart => FocusedPanel::Catalog,
        }
    }
}

/// Application state
pub struct App<'r> {
    // Configuration
    config: AppConfig,
    theme: Theme,

    // Data
    registry: &'r ChartRegistry,
    storage: Storage,
    entries: Vec<&'r ChartEntry>,
    chart: Option<Chart>,

    // UI State
    focused: FocusedPanel,
    selected_chart: usize,
    timeline: TimelineState,
    show_help: bool,

    // Timing
    last_refresh: Instant,
    refreshed_at: DateTime<Local>,

    // Exit flag
    should_quit: bool,

    // Error message to display (non-fatal)
    error_message: Option<String>,
}

impl<'r> App<'r> {
    pub fn new(config: AppConfig, registry: &'r ChartRegistry, storage: Storage) -> Result<Self> {
        let theme = Theme::with_palette(&config.color_palette);
        let entries = registry.entries();

        let selected_chart = match config.initial_chart.as_deref() {
            Some(name) => entries
                .iter()
                .position(|e| e.name == name)
                .with_context(|| format!("Unknown chart: {name}"))?,
            None => 0,
        };

        let mut app = App {
            config,
            theme,
            registry,
            storage,
            entries,
            chart: None,
            focused: FocusedPanel::Catalog,
            selected_chart,
            timeline: TimelineState::default(),
            show_help: false,
            last_refresh: Instant::now(),
            refreshed_at: Local::now(),
            should_quit: false,
            error_message: None,
        };

        app.load_chart()?;

        Ok(app)
    }

    /// Render the selected chart from scratch, resetting timeline playback
    fn load_chart(&mut self) -> Result<()> {
        self.render_selected()?;
        let auto_play = matches!(&self.chart, Some(Chart::Timeline(t)) if t.auto_play);
        self.timeline = TimelineState::new(auto_play);
        Ok(())
    }

    fn render_selected(&mut self) -> Result<()> {
        let Some(entry) = self.entries.get(self.selected_chart) else {
            self.chart = None;
            return Ok(());
        };
        debug!(chart = entry.name, "rendering");
        self.chart = Some(self.registry.render(entry.name, &self.storage)?);
        self.refreshed_at = Local::now();
        Ok(())
    }

    /// Re-query the selected chart, keeping the timeline position
    fn refresh(&mut self) -> Result<()> {
        self.error_message = None;
        self.render_selected()?;
        let frames = self.time_points().len();
        self.timeline.clamp(frames);
        self.last_refresh = Instant::now();
        Ok(())
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    fn time_points(&self) -> Vec<String> {
        match &self.chart {
            Some(Chart::Timeline(t)) => t.frames.iter().map(|f| f.time_point.clone()).collect(),
            _ => Vec::new(),
        }
    }

    fn play_interval(&self) -> Duration {
        match &self.chart {
            Some(Chart::Timeline(t)) => Duration::from_millis(t.play_interval_ms),
            _ => Duration::MAX,
        }
    }

    fn select_chart(&mut self, index: usize) -> Result<()> {
        if index < self.entries.len() && index != self.selected_chart {
            self.selected_chart = index;
            self.load_chart()?;
        }
        Ok(())
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) -> Result<()> {
        // Global shortcuts
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return Ok(());
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return Ok(());
            }
            KeyCode::Char('r') => {
                self.refresh()?;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focused = self.focused.toggle();
                return Ok(());
            }
            _ => {}
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return Ok(());
        }

        // Chart selection with number keys
        if let KeyCode::Char(c) = key {
            if let Some(n) = c.to_digit(10) {
                if n > 0 {
                    return self.select_chart(n as usize - 1);
                }
            }
        }

        // Timeline stepping works from either panel
        let frames = self.time_points().len();
        match key {
            KeyCode::Right | KeyCode::Char(']') => {
                self.timeline.step_forward(frames);
                return Ok(());
            }
            KeyCode::Left | KeyCode::Char('[') => {
                self.timeline.step_back(frames);
                return Ok(());
            }
            KeyCode::Char(' ') => {
                self.timeline.toggle_play();
                return Ok(());
            }
            _ => {}
        }

        match self.focused {
            FocusedPanel::Catalog => self.handle_catalog_navigation(key)?,
            FocusedPanel::Chart => {
                if key == KeyCode::Esc {
                    self.focused = FocusedPanel::Catalog;
                }
            }
        }

        Ok(())
    }

    fn handle_catalog_navigation(&mut self, key: KeyCode) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_chart((self.selected_chart + 1) % self.entries.len())?;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let prev = self
                    .selected_chart
                    .checked_sub(1)
                    .unwrap_or(self.entries.len() - 1);
                self.select_chart(prev)?;
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                self.focused = FocusedPanel::Chart;
            }
            _ => {}
        }
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        // Main layout: body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        // Body layout: catalog (left) and chart (right)
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(34), // Catalog
                Constraint::Min(40),    // Chart
            ])
            .split(main_chunks[0]);

        // Content layout: chart and timeline bar
        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Chart
                Constraint::Length(1), // Timeline
            ])
            .split(body_chunks[1]);

        let catalog = CatalogList::new(&self.entries, self.selected_chart, &self.theme);
        catalog.render(frame, body_chunks[0], self.focused == FocusedPanel::Catalog);

        let entry = self.entries.get(self.selected_chart).copied();
        let fallback_title = entry.map(|e| e.title).unwrap_or("No chart selected");
        let placeholder = Chart::NoData {
            message: "No charts registered".to_string(),
        };
        let chart = self.chart.as_ref().unwrap_or(&placeholder);
        let view = ChartView::new(
            current_frame(chart, self.timeline.frame),
            fallback_title,
            &self.theme,
        );
        view.render(frame, content_chunks[0], self.focused == FocusedPanel::Chart);

        let time_points = self.time_points();
        if !time_points.is_empty() {
            TimelineBar::new(&time_points, &self.timeline, &self.theme)
                .render(frame, content_chunks[1]);
        }

        let status_bar = StatusBar::new(
            entry,
            self.refreshed_at,
            self.error_message.as_deref(),
            &self.theme,
        );
        status_bar.render(frame, main_chunks[1]);

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.entries, self.selected_chart, &self.theme);
            help.render(frame, size);
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Fail before the terminal is touched when nothing has been imported yet
fn ensure_database(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        bail!(
            "No income data found at {}. Import a CSV file first with import-region, import-income or import-gini, or pass --db",
            db_path.display()
        );
    }
    Ok(())
}

/// Run the TUI application
pub fn run(config: AppConfig, registry: &ChartRegistry) -> Result<()> {
    let db_path = &config.db_path;
    ensure_database(db_path)?;
    let storage = Storage::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!(path = %db_path.display(), "starting dashboard");

    // Create app before touching the terminal so errors print normally
    let mut app = App::new(config, registry, storage).context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let tick_rate = Duration::from_secs(app.config.refresh_interval_secs);

    let result = run_main_loop(&mut terminal, &mut app, tick_rate);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        // Check if it's time to refresh (ignore refresh errors, just continue)
        if app.last_refresh.elapsed() >= tick_rate {
            if let Err(e) = app.refresh() {
                app.set_error(format!("Refresh error: {e}"));
                app.last_refresh = Instant::now();
            }
        }

        let frames = app.time_points().len();
        let interval = app.play_interval();
        app.timeline.tick(frames, interval);

        // Handle input with timeout
        let timeout = tick_rate.saturating_sub(app.last_refresh.elapsed());
        if event::poll(timeout.min(Duration::from_millis(100)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = app.handle_input(key.code) {
                        app.set_error(format!("Input error: {e}"));
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
