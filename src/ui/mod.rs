//! Terminal User Interface components for income-charts.

pub mod chart;
mod help;
mod theme;
pub mod timeline;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
