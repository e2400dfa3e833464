use matris_engine::GameState;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Board, next piece preview, and statistics of a running game.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a GameState,
    player: &'a str,
    level_up: bool,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a GameState, player: &'a str) -> Self {
        Self {
            game,
            player,
            level_up: false,
        }
    }

    /// Shows the level-up banner over the board.
    pub fn level_up(self, level_up: bool) -> Self {
        Self { level_up, ..self }
    }

    fn border_color(&self) -> Color {
        if self.game.phase().is_game_over() {
            color::RED
        } else if self.game.is_paused() {
            color::YELLOW
        } else {
            color::WHITE
        }
    }

    fn popup(&self) -> Option<(&'static str, Style)> {
        if self.game.phase().is_game_over() {
            Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
        } else if self.game.is_paused() {
            Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
        } else if self.level_up {
            Some(("LEVEL UP!", Style::new().fg(color::BLACK).bg(color::CYAN)))
        } else {
            None
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(1, 0);
        let border_style = self.border_color();
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = BoardDisplay::new(self.game.board())
            .falling_piece(self.game.active_piece().copied())
            .block(
                Block::bordered()
                    .title(Line::from(self.player).centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let next_panel = PieceDisplay::new(self.game.next_piece()).block(panel("NEXT"));
        let stats_panel = StatsDisplay::new(self.game.stats()).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats_panel.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats_panel.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        stats_panel.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some((text, style)) = self.popup() {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
