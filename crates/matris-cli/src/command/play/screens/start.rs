use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
};

use crate::{
    command::play::{
        app::Session,
        screens::{GameScreen, Screen, Transition},
    },
    highscore::MAX_NAME_LEN,
    view::widgets::{HighscoreDisplay, KeyBinding, KeyBindingDisplay, style},
};

const KEY_BINDINGS: &[KeyBinding] = &[(&["Enter"], "Start"), (&["Esc"], "Quit")];

/// Title screen with player name entry.
#[derive(Debug)]
pub struct StartScreen {
    name: String,
}

impl StartScreen {
    pub fn new(mut name: String) -> Self {
        if let Some((idx, _)) = name.char_indices().nth(MAX_NAME_LEN) {
            name.truncate(idx);
        }
        Self { name }
    }

    pub fn handle_event(&mut self, session: &mut Session, event: &Event) -> Transition {
        let Some(key) = event.as_key_press_event() else {
            return Transition::Stay;
        };
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Transition::Exit,
            KeyCode::Esc => Transition::Exit,
            KeyCode::Enter => {
                let game = session.new_game();
                Transition::Replace(Screen::Play(GameScreen::new(&self.name, game)))
            }
            KeyCode::Backspace => {
                self.name.pop();
                Transition::Stay
            }
            KeyCode::Char(c) if !c.is_control() && self.name.chars().count() < MAX_NAME_LEN => {
                self.name.push(c);
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame<'_>) {
        let highscores = HighscoreDisplay::new(session.highscores()).block(
            Block::bordered()
                .title(Line::from("HIGHSCORES").centered())
                .style(style::DEFAULT),
        );

        let [column] = Layout::horizontal([Constraint::Length(highscores.width())])
            .flex(Flex::Center)
            .areas(frame.area());
        let [title_area, name_area, table_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(highscores.height()),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(column);

        let title = Text::from(vec![
            Line::styled("M A T R I S", style::TITLE),
            Line::styled("a falling block puzzle", style::DIM),
        ])
        .centered();
        frame.render_widget(title, title_area);

        let prompt = Line::from(vec![
            Span::styled("Name: ", style::DIM),
            Span::styled(self.name.as_str(), style::DEFAULT),
            Span::styled("_", style::HIGHLIGHT),
        ]);
        frame.render_widget(
            Paragraph::new(prompt).block(Block::bordered().style(style::DEFAULT)),
            name_area,
        );
        frame.render_widget(highscores, table_area);
        frame.render_widget(KeyBindingDisplay::new(KEY_BINDINGS), help_area);
    }
}
