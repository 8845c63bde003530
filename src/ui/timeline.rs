//! Timeline frame selection state and widget.
//!
//! A timeline chart holds one frame per time point. Up to 9 time points are
//! shown in a window that follows the selected frame, and playback advances
//! the selection on the timeline's own interval.

use std::ops::Range;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::Theme;

/// Maximum number of time points displayed
pub const MAX_SLOTS: usize = 9;

/// Playback and selection state for the open timeline
#[derive(Debug, Clone)]
pub struct TimelineState {
    /// Index of the displayed frame
    pub frame: usize,
    pub playing: bool,
    last_step: Instant,
}

impl Default for TimelineState {
    fn default() -> Self {
        TimelineState {
            frame: 0,
            playing: false,
            last_step: Instant::now(),
        }
    }
}

impl TimelineState {
    pub fn new(auto_play: bool) -> Self {
        TimelineState {
            playing: auto_play,
            ..Self::default()
        }
    }

    /// Move to the next frame, wrapping to the first
    pub fn step_forward(&mut self, num_frames: usize) {
        if num_frames == 0 {
            return;
        }
        self.frame = (self.frame + 1) % num_frames;
        self.last_step = Instant::now();
    }

    /// Move to the previous frame, wrapping to the last
    pub fn step_back(&mut self, num_frames: usize) {
        if num_frames == 0 {
            return;
        }
        self.frame = (self.frame + num_frames - 1) % num_frames;
        self.last_step = Instant::now();
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        self.last_step = Instant::now();
    }

    /// Advance one frame if playing and `interval` has passed since the last
    /// step. Returns whether the frame changed.
    pub fn tick(&mut self, num_frames: usize, interval: Duration) -> bool {
        if !self.playing || num_frames < 2 || self.last_step.elapsed() < interval {
            return false;
        }
        self.step_forward(num_frames);
        true
    }

    /// Keep the selection valid after the frame count changes
    pub fn clamp(&mut self, num_frames: usize) {
        if self.frame >= num_frames {
            self.frame = num_frames.saturating_sub(1);
        }
    }

    /// Indices of the time points shown, keeping the selection roughly centered
    pub fn visible_window(&self, num_frames: usize) -> Range<usize> {
        if num_frames <= MAX_SLOTS {
            return 0..num_frames;
        }
        let start = self
            .frame
            .saturating_sub(MAX_SLOTS / 2)
            .min(num_frames - MAX_SLOTS);
        start..start + MAX_SLOTS
    }
}

/// Time point bar drawn under a timeline chart
pub struct TimelineBar<'a> {
    time_points: &'a [String],
    state: &'a TimelineState,
    theme: &'a Theme,
}

impl<'a> TimelineBar<'a> {
    pub fn new(time_points: &'a [String], state: &'a TimelineState, theme: &'a Theme) -> Self {
        TimelineBar {
            time_points,
            state,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let num_frames = self.time_points.len();
        let window = self.state.visible_window(num_frames);

        let mut spans = vec![Span::styled(
            if self.state.playing { "▶ " } else { "⏸ " },
            self.theme.title_style(),
        )];

        if window.start > 0 {
            spans.push(Span::raw("< "));
        }

        for idx in window.clone() {
            let style = if idx == self.state.frame {
                self.theme.highlight_style()
            } else {
                self.theme.normal_style()
            };
            spans.push(Span::styled(self.time_points[idx].clone(), style));
            spans.push(Span::raw("  "));
        }

        if window.end < num_frames {
            spans.push(Span::raw(">"));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(self.theme.normal_style());
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = TimelineState::new(true);
        assert_eq!(state.frame, 0);
        assert!(state.playing);
        assert!(!TimelineState::new(false).playing);
    }

    #[test]
    fn test_step_forward_wraps() {
        let mut state = TimelineState::new(false);
        state.step_forward(3);
        state.step_forward(3);
        assert_eq!(state.frame, 2);
        state.step_forward(3);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_step_back_wraps() {
        let mut state = TimelineState::new(false);
        state.step_back(8);
        assert_eq!(state.frame, 7);
        state.step_back(8);
        assert_eq!(state.frame, 6);
    }

    #[test]
    fn test_step_with_no_frames() {
        let mut state = TimelineState::new(false);
        state.step_forward(0);
        state.step_back(0);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_tick_only_when_playing() {
        let mut paused = TimelineState::new(false);
        assert!(!paused.tick(8, Duration::ZERO));
        assert_eq!(paused.frame, 0);

        let mut playing = TimelineState::new(true);
        assert!(playing.tick(8, Duration::ZERO));
        assert_eq!(playing.frame, 1);

        // A single frame never advances
        assert!(!playing.tick(1, Duration::ZERO));
        // Interval not yet elapsed
        assert!(!playing.tick(8, Duration::from_secs(3600)));
    }

    #[test]
    fn test_toggle_play() {
        let mut state = TimelineState::new(false);
        state.toggle_play();
        assert!(state.playing);
        state.toggle_play();
        assert!(!state.playing);
    }

    #[test]
    fn test_clamp_after_frames_reduced() {
        let mut state = TimelineState::new(false);
        state.frame = 7;
        state.clamp(3);
        assert_eq!(state.frame, 2);
        state.clamp(0);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_visible_window_fits_all() {
        let state = TimelineState::new(false);
        assert_eq!(state.visible_window(8), 0..8);
        assert_eq!(state.visible_window(0), 0..0);
    }

    #[test]
    fn test_visible_window_follows_selection() {
        // 29 quarterly frames, 2014_Q1 through 2021_Q1
        let mut state = TimelineState::new(false);
        assert_eq!(state.visible_window(29), 0..9);

        state.frame = 10;
        assert_eq!(state.visible_window(29), 6..15);

        state.frame = 28;
        assert_eq!(state.visible_window(29), 20..29);
    }
}
