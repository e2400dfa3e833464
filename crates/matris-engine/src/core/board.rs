use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceKind};

/// Number of board columns.
pub const COLS: usize = 10;
/// Number of board rows.
pub const ROWS: usize = 20;

/// A single board cell.
///
/// Occupancy and piece type travel together; color is left to the renderer,
/// which derives it from the [`PieceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// No block.
    #[default]
    Empty,
    /// Locked block of a specific piece type.
    Occupied(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Occupied(kind)),
                None => None,
            },
        }
    }
}

/// A single board row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow {
    cells: [Cell; COLS],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; COLS],
    };

    #[must_use]
    pub fn cells(&self) -> &[Cell; COLS] {
        &self.cells
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| c.is_occupied())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// The playfield holding locked pieces.
///
/// A fixed `COLS`×`ROWS` (10×20) grid; row 0 is the top. The dimensions never
/// change during a game. A new game starts from [`Board::EMPTY`].
///
/// # Example
///
/// ```
/// use matris_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::spawn(PieceKind::I);
/// let (landed, _) = piece.drop_position(&board);
/// board.merge(&landed);
///
/// assert!(board.collides(&landed));
/// assert_eq!(board.sweep_completed_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one string per row, top to bottom (e.g., "....TT....")
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.as_char()).collect())
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lines = Vec::<String>::deserialize(deserializer)?;
        if lines.len() != ROWS {
            return Err(serde::de::Error::custom(format!(
                "expected {ROWS} rows, got {}",
                lines.len()
            )));
        }

        let mut board = Self::EMPTY;
        for (y, line) in lines.iter().enumerate() {
            let count = line.chars().count();
            if count != COLS {
                return Err(serde::de::Error::custom(format!(
                    "expected {COLS} cells at row {y}, got {count}"
                )));
            }
            for (x, c) in line.chars().enumerate() {
                board.rows[y].cells[x] = Cell::from_char(c).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid cell '{c}' at ({x}, {y})"))
                })?;
            }
        }
        Ok(board)
    }
}

impl Board {
    pub const COLS: usize = COLS;
    pub const ROWS: usize = ROWS;

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) const SIGNED_COLS: i16 = COLS as i16;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) const SIGNED_ROWS: i16 = ROWS as i16;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; ROWS],
    };

    /// Returns the cell at column `x`, row `y`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y].cells[x]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|c| c.is_occupied())
            .count()
    }

    fn index(x: i16, y: i16) -> Option<(usize, usize)> {
        if (0..Self::SIGNED_COLS).contains(&x) && (0..Self::SIGNED_ROWS).contains(&y) {
            Some((x.unsigned_abs().into(), y.unsigned_abs().into()))
        } else {
            None
        }
    }

    /// Checks whether the piece overlaps a wall, the floor, or a locked block.
    ///
    /// Returns `true` if any occupied piece cell lies outside rows
    /// `[0, ROWS)` or columns `[0, COLS)`, or lands on an occupied cell.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece
            .occupied_positions()
            .into_iter()
            .any(|(x, y)| match Self::index(x, y) {
                Some((x, y)) => self.rows[y].cells[x].is_occupied(),
                None => true,
            })
    }

    /// Locks a piece onto the board by writing its kind into its cells.
    ///
    /// The caller must have checked that the piece does not collide.
    /// Cells outside the board are skipped.
    pub fn merge(&mut self, piece: &Piece) {
        let cell = Cell::Occupied(piece.kind());
        for (x, y) in piece.occupied_positions() {
            if let Some((x, y)) = Self::index(x, y) {
                self.rows[y].cells[x] = cell;
            }
        }
    }

    /// Removes completely occupied rows and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. Remaining rows keep their relative
    /// order and fall down over the removed ones; empty rows refill the top.
    /// Full rows need not be contiguous.
    pub fn sweep_completed_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..ROWS).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Creates a `Board` from ASCII art, for tests and fixtures.
    ///
    /// `.` is an empty cell, a piece letter (`I`, `O`, `T`, `S`, `Z`, `J`, `L`)
    /// an occupied one; other characters are ignored. Each row must have
    /// exactly 10 cells. Rows are listed top to bottom and aligned to the
    /// bottom of the board, so short art describes the lowest rows.
    ///
    /// ```
    /// use matris_engine::{Board, Cell, PieceKind};
    ///
    /// let board = Board::from_ascii(
    ///     "
    ///     ..........
    ///     IIII.OOOOO
    ///     ",
    /// );
    /// assert_eq!(board.cell(0, 19), Cell::Occupied(PieceKind::I));
    /// assert_eq!(board.cell(4, 19), Cell::Empty);
    /// assert_eq!(board.cell(0, 18), Cell::Empty);
    /// ```
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<Cell>> = art
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.chars().filter_map(Cell::from_char).collect())
            .collect();
        assert!(
            lines.len() <= ROWS,
            "At most {ROWS} rows are allowed, got {}",
            lines.len()
        );

        let mut board = Self::EMPTY;
        let top = ROWS - lines.len();
        for (i, cells) in lines.iter().enumerate() {
            assert_eq!(
                cells.len(),
                COLS,
                "Each row must have exactly {COLS} cells, got {} at row {i}",
                cells.len()
            );
            board.rows[top + i].cells.copy_from_slice(cells);
        }
        board
    }
}
