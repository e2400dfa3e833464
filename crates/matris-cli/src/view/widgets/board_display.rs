use std::iter;

use matris_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::BlockDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(Board::COLS).unwrap() * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(Board::ROWS).unwrap() * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut board = self.board.clone();
        if let Some(piece) = self.falling_piece {
            board.merge(&piece);
        }

        let col_constraints = (0..Board::COLS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..Board::ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ Board::ROWS }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ Board::COLS }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, board.rows()) {
            for (grid_cell, cell) in iter::zip(grid_row, row.cells()) {
                BlockDisplay::from_cell(*cell, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use matris_engine::PieceKind;

    use super::*;

    #[test]
    fn test_renders_board_and_falling_piece() {
        let board = Board::from_ascii(
            "
            ZZ........
            ",
        );
        let widget = BoardDisplay::new(&board).falling_piece(Some(Piece::spawn(PieceKind::O)));
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        // falling O at columns 4-5 of the top row
        assert_eq!(buf[(8, 0)].bg, crate::view::widgets::color::YELLOW);
        // empty cells are two columns wide with the dot on the right
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(1, 0)].symbol(), ".");
        // locked Z at the bottom-left
        assert_eq!(buf[(0, 19)].bg, crate::view::widgets::color::RED);
    }
}
