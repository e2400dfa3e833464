use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::{
    highscore::{HighscoreTable, MAX_ENTRIES},
    view::widgets::style,
};

/// The highscore list, optionally highlighting one rank.
#[derive(Debug)]
pub struct HighscoreDisplay<'a> {
    table: &'a HighscoreTable,
    highlight: Option<usize>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> HighscoreDisplay<'a> {
    pub fn new(table: &'a HighscoreTable) -> Self {
        Self {
            table,
            highlight: None,
            block: None,
        }
    }

    pub fn highlight(self, rank: Option<usize>) -> Self {
        Self {
            highlight: rank,
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
        u16::try_from(header().chars().count()).unwrap()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(MAX_ENTRIES + 1).unwrap() + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::styled(header(), style::DIM)];
        if self.table.is_empty() {
            lines.push(Line::styled("No scores yet", style::DIM).centered());
            return lines;
        }
        for (rank, entry) in self.table.entries().iter().enumerate() {
            let text = format!(
                "{:>2}. {:<16} {:>8} {:>5} {:>5}  {}",
                rank + 1,
                entry.name,
                entry.score,
                entry.level,
                entry.lines,
                entry.date.format("%Y-%m-%d"),
            );
            let style = if self.highlight == Some(rank) {
                style::HIGHLIGHT
            } else {
                style::DEFAULT
            };
            lines.push(Line::styled(text, style));
        }
        lines
    }
}

fn header() -> String {
    format!(
        "{:>2}  {:<16} {:>8} {:>5} {:>5}  {:<10}",
        "#", "NAME", "SCORE", "LEVEL", "LINES", "DATE"
    )
}

impl Widget for HighscoreDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Text::from(self.lines()).style(style::DEFAULT).render(area, buf);
    }
}
