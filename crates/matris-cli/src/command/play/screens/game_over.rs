use crossterm::event::{Event, KeyCode};
use matris_engine::GameResult;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::Block,
};

use crate::{
    command::play::{
        app::Session,
        screens::{Screen, StartScreen, Transition},
    },
    view::widgets::{HighscoreDisplay, KeyBinding, KeyBindingDisplay, style},
};

const KEY_BINDINGS: &[KeyBinding] = &[(&["Enter"], "Play Again"), (&["Q", "Esc"], "Quit")];

/// Final result of a game and the refreshed highscores.
#[derive(Debug)]
pub struct GameOverScreen {
    player: String,
    result: GameResult,
    rank: Option<usize>,
}

impl GameOverScreen {
    pub fn new(player: String, result: GameResult, rank: Option<usize>) -> Self {
        Self {
            player,
            result,
            rank,
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Transition {
        let Some(key) = event.as_key_press_event() else {
            return Transition::Stay;
        };
        match key.code {
            KeyCode::Enter => {
                Transition::Replace(Screen::Start(StartScreen::new(self.player.clone())))
            }
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Transition::Exit,
            _ => Transition::Stay,
        }
    }

    fn summary(&self) -> Text<'_> {
        let rank_line = match self.rank {
            Some(rank) => Line::styled(
                format!("New highscore! Rank #{}", rank + 1),
                style::HIGHLIGHT,
            ),
            None => Line::styled("Not in the top ten", style::DIM),
        };
        Text::from(vec![
            Line::styled("GAME OVER", style::TITLE),
            Line::from(format!(
                "{}  score {}  level {}  lines {}",
                self.player, self.result.score, self.result.level, self.result.lines
            )),
            rank_line,
        ])
        .style(style::DEFAULT)
        .centered()
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame<'_>) {
        let highscores = HighscoreDisplay::new(session.highscores())
            .highlight(self.rank)
            .block(
                Block::bordered()
                    .title(Line::from("HIGHSCORES").centered())
                    .style(style::DEFAULT),
            );

        let [column] = Layout::horizontal([Constraint::Length(highscores.width())])
            .flex(Flex::Center)
            .areas(frame.area());
        let [summary_area, table_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(highscores.height()),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(column);

        frame.render_widget(self.summary(), summary_area);
        frame.render_widget(highscores, table_area);
        frame.render_widget(KeyBindingDisplay::new(KEY_BINDINGS), help_area);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::command::play::app::tests::{key, session, temp_dir};

    const RESULT: GameResult = GameResult {
        score: 1200,
        level: 2,
        lines: 11,
    };

    #[test]
    fn test_enter_returns_to_start_with_same_name() {
        let mut screen = GameOverScreen::new("frank".to_owned(), RESULT, None);
        let Transition::Replace(Screen::Start(start)) = screen.handle_event(&key(KeyCode::Enter))
        else {
            panic!("expected start screen");
        };
        assert!(format!("{start:?}").contains("frank"));
        assert!(matches!(
            screen.handle_event(&key(KeyCode::Char('q'))),
            Transition::Exit
        ));
    }

    #[test]
    fn test_draw_shows_result_and_rank() {
        let dir = temp_dir("game-over-draw");
        let mut session = session(&dir);
        let rank = session.record("frank", RESULT);
        let screen = GameOverScreen::new("frank".to_owned(), RESULT, rank);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| screen.draw(&session, f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("frank  score 1200  level 2  lines 11"));
        assert!(text.contains("New highscore! Rank #1"));
        _ = fs::remove_dir_all(&dir);
    }
}
