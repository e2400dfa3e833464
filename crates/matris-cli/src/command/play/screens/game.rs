use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use matris_engine::{GameResult, GameState, InputAction};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    command::play::{
        app::Session,
        screens::{GameOverScreen, Screen, Transition},
    },
    highscore::normalize_name,
    view::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay},
};

const LEVEL_UP_BANNER: Duration = Duration::from_millis(1500);
const GAME_OVER_HOLD: Duration = Duration::from_secs(2);

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑"], "Rotate"),
    (&["Space"], "Hard Drop"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const FINISHED_KEYS: &[KeyBinding] = &[(&["Any key"], "Continue"), (&["Q"], "Quit")];

fn input_action(code: KeyCode) -> Option<InputAction> {
    let action = match code {
        KeyCode::Left => InputAction::MoveLeft,
        KeyCode::Right => InputAction::MoveRight,
        KeyCode::Down => InputAction::SoftDrop,
        KeyCode::Up => InputAction::Rotate,
        KeyCode::Char(' ') => InputAction::HardDrop,
        KeyCode::Char('p' | 'P') => InputAction::TogglePause,
        _ => return None,
    };
    Some(action)
}

/// A finished game, already recorded, shown for a moment before the result
/// screen.
#[derive(Debug)]
struct Finished {
    result: GameResult,
    rank: Option<usize>,
    remaining: Duration,
}

#[derive(Debug)]
pub struct GameScreen {
    player: String,
    game: GameState,
    level_up_remaining: Duration,
    finished: Option<Finished>,
}

impl GameScreen {
    pub fn new(player: &str, game: GameState) -> Self {
        Self {
            player: normalize_name(player),
            game,
            level_up_remaining: Duration::ZERO,
            finished: None,
        }
    }

    pub fn handle_event(&mut self, session: &mut Session, event: &Event) -> Transition {
        let Some(key) = event.as_key_press_event() else {
            return Transition::Stay;
        };
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Transition::Exit,
            _ if self.finished.is_some() => self.leave(),
            code => {
                if let Some(action) = input_action(code) {
                    self.game.apply(action);
                }
                self.after_step(session)
            }
        }
    }

    pub fn update(&mut self, session: &mut Session, elapsed: Duration) -> Transition {
        if let Some(finished) = &mut self.finished {
            finished.remaining = finished.remaining.saturating_sub(elapsed);
            if finished.remaining.is_zero() {
                return self.leave();
            }
            return Transition::Stay;
        }
        self.level_up_remaining = self.level_up_remaining.saturating_sub(elapsed);
        self.game.tick(elapsed);
        self.after_step(session)
    }

    /// Forwards queued events to the cue sink and records the game once it
    /// is over.
    fn after_step(&mut self, session: &mut Session) -> Transition {
        for event in self.game.drain_events() {
            if event.is_level_up() {
                self.level_up_remaining = LEVEL_UP_BANNER;
            }
            session.cues().play(&event);
        }

        if self.finished.is_none()
            && let Some(result) = self.game.result()
        {
            let rank = session.record(&self.player, result);
            self.level_up_remaining = Duration::ZERO;
            self.finished = Some(Finished {
                result,
                rank,
                remaining: GAME_OVER_HOLD,
            });
        }
        Transition::Stay
    }

    fn leave(&self) -> Transition {
        let Some(finished) = &self.finished else {
            return Transition::Stay;
        };
        Transition::Replace(Screen::GameOver(GameOverScreen::new(
            self.player.clone(),
            finished.result,
            finished.rank,
        )))
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let display = GameDisplay::new(&self.game, &self.player)
            .level_up(!self.level_up_remaining.is_zero());
        let bindings = if self.finished.is_some() {
            FINISHED_KEYS
        } else if self.game.is_paused() {
            PAUSED_KEYS
        } else {
            PLAYING_KEYS
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }
}
