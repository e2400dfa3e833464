//! Audio cues for game events.
//!
//! The terminal has no sampled audio; the closest cue is the bell.

use std::{fmt, io::Write};

use matris_engine::GameEvent;

/// Consumer of [`GameEvent`] cues.
///
/// Playing a cue never fails from the caller's point of view.
pub trait CueSink: fmt::Debug {
    fn play(&mut self, event: &GameEvent);
}

/// Ignores every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl CueSink for Silent {
    fn play(&mut self, _event: &GameEvent) {}
}

/// Rings the terminal bell for line clears, level ups, and game over.
#[derive(Debug)]
pub struct TerminalBell<W> {
    out: W,
}

impl<W> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn rings_for(event: &GameEvent) -> bool {
        matches!(
            event,
            GameEvent::LineClear { .. } | GameEvent::LevelUp { .. } | GameEvent::GameOver
        )
    }
}

impl<W> CueSink for TerminalBell<W>
where
    W: Write + fmt::Debug,
{
    fn play(&mut self, event: &GameEvent) {
        if Self::rings_for(event) {
            _ = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
        }
    }
}
