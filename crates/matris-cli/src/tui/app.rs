use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications driven by [`Tui::run`].
pub trait App {
    /// Called once before the event loop starts. Use this to configure the tick and render rates.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);

    /// Advances the application by `elapsed`, the time since the previous tick.
    fn update(&mut self, tui: &mut Tui, elapsed: Duration);
}
