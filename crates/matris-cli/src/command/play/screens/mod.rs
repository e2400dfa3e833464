use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::command::play::app::Session;

pub use self::{game::GameScreen, game_over::GameOverScreen, start::StartScreen};

mod game;
mod game_over;
mod start;

#[derive(Debug, derive_more::IsVariant)]
pub enum Screen {
    Start(StartScreen),
    Play(GameScreen),
    GameOver(GameOverScreen),
}

/// Screen transition result from event handling or updates.
#[derive(Debug)]
pub enum Transition {
    Stay,
    Replace(Screen),
    Exit,
}

impl Screen {
    pub fn handle_event(&mut self, session: &mut Session, event: &Event) -> Transition {
        match self {
            Screen::Start(screen) => screen.handle_event(session, event),
            Screen::Play(screen) => screen.handle_event(session, event),
            Screen::GameOver(screen) => screen.handle_event(event),
        }
    }

    pub fn update(&mut self, session: &mut Session, elapsed: Duration) -> Transition {
        match self {
            Screen::Play(screen) => screen.update(session, elapsed),
            Screen::Start(_) | Screen::GameOver(_) => Transition::Stay,
        }
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame<'_>) {
        match self {
            Screen::Start(screen) => screen.draw(session, frame),
            Screen::Play(screen) => screen.draw(frame),
            Screen::GameOver(screen) => screen.draw(session, frame),
        }
    }
}
