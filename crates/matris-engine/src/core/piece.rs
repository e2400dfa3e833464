use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::board::{Board, Cell};

/// Horizontal offsets tried, in order, when a rotated piece collides.
///
/// Offsets are relative to the column the piece occupied before rotating.
pub const KICK_OFFSETS: [i16; 4] = [0, -1, 1, 2];

/// A falling piece: a shape in its current rotation placed on the board.
///
/// Pieces are values. Movement and rotation return new `Piece` instances and
/// never check the board; use [`Board::collides`] to validate a placement.
///
/// # Example
///
/// ```
/// use matris_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::spawn(PieceKind::T);
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let moved = piece.left();
/// assert!(!board.collides(&moved));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    shape: PieceShape,
    position: PiecePosition,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "T#1@4,7")
        let s = format!(
            "{}#{}@{},{}",
            self.kind().as_char(),
            self.shape.rotation.quarter_turns(),
            self.position.x,
            self.position.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!("expected format 'kind#rotation@x,y', got '{s}'"))
        })?;
        let mut kind_chars = kind_str.chars();
        let kind = match (kind_chars.next(), kind_chars.next()) {
            (Some(c), None) => PieceKind::from_char(c)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {c}")))?,
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "piece kind must be single character, got '{kind_str}'"
                )));
            }
        };

        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '@' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let rotation_num = rotation_str.parse::<u8>().map_err(|e| {
            serde::de::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation_num > 3 {
            return Err(serde::de::Error::custom(format!(
                "rotation must be 0-3, got {rotation_num}"
            )));
        }

        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing ',' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let x = x_str
            .parse::<i16>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i16>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        let mut shape = PieceShape::spawn(kind);
        for _ in 0..rotation_num {
            shape = shape.rotated_right();
        }

        Ok(Piece {
            shape,
            position: PiecePosition::new(x, y),
        })
    }
}

impl Piece {
    /// Creates a piece of the given kind at its spawn position.
    ///
    /// The piece is placed on row 0, horizontally centered: its left column is
    /// `COLS / 2 - width / 2` (integer division).
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = PieceShape::spawn(kind);
        Self::with_shape(shape, PiecePosition::spawn_for(&shape))
    }

    #[must_use]
    pub const fn with_shape(shape: PieceShape, position: PiecePosition) -> Self {
        Self { shape, position }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.shape.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    /// Returns the board coordinates `(x, y)` of every occupied cell.
    ///
    /// Coordinates may lie outside the board for a piece that has not been
    /// validated against it.
    #[must_use]
    pub fn occupied_positions(&self) -> ArrayVec<(i16, i16), 4> {
        self.shape
            .occupied_positions()
            .map(|(dx, dy)| (self.position.x + dx, self.position.y + dy))
            .collect()
    }

    #[must_use]
    pub const fn shifted(&self, dx: i16, dy: i16) -> Self {
        Self {
            shape: self.shape,
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
        }
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Rotates the shape 90° clockwise around the piece origin.
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        Self {
            shape: self.shape.rotated_right(),
            position: self.position,
        }
    }

    /// Rotates the piece clockwise, trying a simplified wall kick on collision.
    ///
    /// The rotated shape is probed at each of [`KICK_OFFSETS`] relative to the
    /// original column, and the first placement that fits is returned.
    /// Vertical offsets and per-rotation kick tables are not attempted.
    ///
    /// Returns `None` for the O-piece (rotation is a no-op) and when every
    /// probe collides; in both cases the caller keeps the original piece.
    #[must_use]
    pub fn rotated_with_kick(&self, board: &Board) -> Option<Self> {
        if self.kind() == PieceKind::O {
            return None;
        }
        let rotated = self.rotated_right();
        KICK_OFFSETS
            .iter()
            .map(|&dx| rotated.shifted(dx, 0))
            .find(|piece| !board.collides(piece))
    }

    /// Returns the lowest position reachable by dropping straight down.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> (Self, usize) {
        let mut dropped = *self;
        let mut rows = 0;
        loop {
            let next = dropped.down();
            if board.collides(&next) {
                return (dropped, rows);
            }
            dropped = next;
            rows += 1;
        }
    }
}

/// Position of a piece's bounding box top-left corner on the board.
///
/// - (0, 0) is the top-left cell of the board
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// Coordinates are signed: a wall kick probe may place a piece one column
/// left of the board before the placement is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i16,
    y: i16,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    fn spawn_for(shape: &PieceShape) -> Self {
        let x = Board::SIGNED_COLS / 2 - i16::from(shape.width / 2);
        Self::new(x, 0)
    }

    #[must_use]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i16 {
        self.y
    }
}

/// Number of clockwise quarter turns applied to a shape since spawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }
}

/// The seven tetromino types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Independent uniform draw over the seven kinds.
///
/// There is no bag: the same kind may be drawn any number of times in a row.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use matris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// ```
    /// use matris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Occupancy grid of a piece in one rotation.
///
/// The grid is the tight bounding box of the piece (at most 4×4). Each row
/// is stored as a bitmask where bit `x` marks column `x` as occupied.
/// Shapes are immutable; [`rotated_right`](Self::rotated_right) builds a new
/// grid with width and height swapped.
///
/// ```
/// use matris_engine::{Cell, PieceKind, PieceShape};
///
/// let t = PieceShape::spawn(PieceKind::T);
/// assert_eq!((t.width(), t.height()), (3, 2));
/// assert_eq!(t.cell(1, 0), Cell::Occupied(PieceKind::T));
/// assert_eq!(t.cell(0, 0), Cell::Empty);
///
/// let rotated = t.rotated_right();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    kind: PieceKind,
    rotation: PieceRotation,
    width: u8,
    height: u8,
    rows: [u8; 4],
}

impl PieceShape {
    /// Returns the spawn-orientation grid for `kind`.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        SPAWN_SHAPES[kind as usize]
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at `(x, y)` inside the bounding box is occupied.
    ///
    /// Cells outside the bounding box are empty.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width as usize && y < self.height as usize && (self.rows[y] & (1 << x)) != 0
    }

    /// Returns the grid cell at `(x, y)`, tagged with the piece kind when occupied.
    #[must_use]
    pub const fn cell(&self, x: usize, y: usize) -> Cell {
        if self.is_occupied(x, y) {
            Cell::Occupied(self.kind)
        } else {
            Cell::Empty
        }
    }

    /// Returns an iterator of occupied `(dx, dy)` offsets within the bounding box.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width)
                .filter(move |&dx| self.is_occupied(usize::from(dx), usize::from(dy)))
                .map(move |dx| (i16::from(dx), i16::from(dy)))
        })
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// Cell `(row i, column j)` of the result is cell
    /// `(row height - 1 - j, column i)` of the original.
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        let mut rows = [0; 4];
        let mut i = 0;
        while i < self.width {
            let mut j = 0;
            while j < self.height {
                if self.is_occupied(i as usize, (self.height - 1 - j) as usize) {
                    rows[i as usize] |= 1 << j;
                }
                j += 1;
            }
            i += 1;
        }
        Self {
            kind: self.kind,
            rotation: self.rotation.rotated_right(),
            width: self.height,
            height: self.width,
            rows,
        }
    }
}

/// Builds a spawn shape from rows of 0/1 cells, top row first.
#[expect(clippy::cast_possible_truncation)]
const fn shape(kind: PieceKind, cells: &[&[u8]]) -> PieceShape {
    assert!(!cells.is_empty() && cells.len() <= 4);
    let width = cells[0].len();
    assert!(width <= 4);
    let mut rows = [0; 4];
    let mut y = 0;
    while y < cells.len() {
        assert!(cells[y].len() == width);
        let mut x = 0;
        while x < width {
            if cells[y][x] != 0 {
                rows[y] |= 1 << x;
            }
            x += 1;
        }
        y += 1;
    }
    PieceShape {
        kind,
        rotation: PieceRotation(0),
        width: width as u8,
        height: cells.len() as u8,
        rows,
    }
}

const SPAWN_SHAPES: [PieceShape; PieceKind::LEN] = [
    shape(PieceKind::I, &[&[1, 1, 1, 1]]),
    shape(PieceKind::O, &[&[1, 1], &[1, 1]]),
    shape(PieceKind::T, &[&[0, 1, 0], &[1, 1, 1]]),
    shape(PieceKind::S, &[&[0, 1, 1], &[1, 1, 0]]),
    shape(PieceKind::Z, &[&[1, 1, 0], &[0, 1, 1]]),
    shape(PieceKind::J, &[&[1, 0, 0], &[1, 1, 1]]),
    shape(PieceKind::L, &[&[0, 0, 1], &[1, 1, 1]]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(shape: &PieceShape) -> Vec<String> {
        (0..shape.height())
            .map(|y| {
                (0..shape.width())
                    .map(|x| if shape.is_occupied(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_spawn_shapes_have_four_cells() {
        for kind in PieceKind::ALL {
            let shape = PieceShape::spawn(kind);
            assert_eq!(shape.occupied_positions().count(), 4, "{kind:?}");
            assert_eq!(shape.kind(), kind);
            assert_eq!(shape.rotation(), PieceRotation::default());
        }
    }

    #[test]
    fn test_spawn_shape_cells_are_tagged_with_kind() {
        let l = PieceShape::spawn(PieceKind::L);
        assert_eq!(grid(&l), ["..#", "###"]);
        assert_eq!(l.cell(2, 0), Cell::Occupied(PieceKind::L));
        assert_eq!(l.cell(0, 0), Cell::Empty);
        // outside the bounding box
        assert_eq!(l.cell(3, 0), Cell::Empty);
        assert_eq!(l.cell(0, 2), Cell::Empty);
    }

    #[test]
    fn test_rotation_transposes_and_reverses() {
        let t = PieceShape::spawn(PieceKind::T);
        assert_eq!(grid(&t), [".#.", "###"]);

        let r1 = t.rotated_right();
        assert_eq!(grid(&r1), ["#.", "##", "#."]);

        let r2 = r1.rotated_right();
        assert_eq!(grid(&r2), ["###", ".#."]);

        let r3 = r2.rotated_right();
        assert_eq!(grid(&r3), [".#", "##", ".#"]);

        let r4 = r3.rotated_right();
        assert_eq!(grid(&r4), grid(&t));
        assert_eq!(r4, t);
    }

    #[test]
    fn test_i_rotation_swaps_dimensions() {
        let i = PieceShape::spawn(PieceKind::I);
        assert_eq!((i.width(), i.height()), (4, 1));
        let vertical = i.rotated_right();
        assert_eq!((vertical.width(), vertical.height()), (1, 4));
        assert_eq!(grid(&vertical), ["#", "#", "#", "#"]);
    }

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(Piece::spawn(PieceKind::I).position(), PiecePosition::new(3, 0));
        assert_eq!(Piece::spawn(PieceKind::O).position(), PiecePosition::new(4, 0));
        assert_eq!(Piece::spawn(PieceKind::T).position(), PiecePosition::new(4, 0));
        assert_eq!(Piece::spawn(PieceKind::J).position(), PiecePosition::new(4, 0));
    }

    #[test]
    fn test_occupied_positions_are_offset_by_position() {
        let piece = Piece::spawn(PieceKind::S).shifted(-2, 5);
        let cells = piece.occupied_positions();
        assert_eq!(cells.as_slice(), &[(3, 5), (4, 5), (2, 6), (3, 6)]);
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let board = Board::EMPTY;
        let piece = Piece::spawn(PieceKind::O).shifted(0, 5);
        assert_eq!(piece.rotated_with_kick(&board), None);
    }

    #[test]
    fn test_rotation_without_obstacle_keeps_position() {
        let board = Board::EMPTY;
        let piece = Piece::spawn(PieceKind::T).shifted(0, 5);
        let rotated = piece.rotated_with_kick(&board).unwrap();
        assert_eq!(rotated.position(), piece.position());
        assert_eq!(rotated.shape(), &piece.shape().rotated_right());
    }

    #[test]
    fn test_kick_left_at_right_wall() {
        let board = Board::EMPTY;
        // Vertical I at the rightmost column; the horizontal bar needs x <= 6.
        let vertical = Piece::with_shape(
            PieceShape::spawn(PieceKind::I).rotated_right(),
            PiecePosition::new(9, 5),
        );
        assert!(!board.collides(&vertical));
        // offsets 0 and -1 still overflow; +1 and +2 overflow further.
        assert_eq!(vertical.rotated_with_kick(&board), None);

        let vertical = Piece::with_shape(*vertical.shape(), PiecePosition::new(7, 5));
        let rotated = vertical.rotated_with_kick(&board).unwrap();
        assert_eq!(rotated.position(), PiecePosition::new(6, 5));
    }

    #[test]
    fn test_kick_falls_through_to_plus_two() {
        // Row 10 is blocked at column 1, so the horizontal bar collides at
        // offsets 0 and +1, leaves the board at -1, and only fits at +2.
        let board = Board::from_ascii(
            "
            .I........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ",
        );
        let vertical = Piece::with_shape(
            PieceShape::spawn(PieceKind::I).rotated_right(),
            PiecePosition::new(0, 10),
        );
        assert!(!board.collides(&vertical));

        let rotated = vertical.rotated_with_kick(&board).unwrap();
        assert_eq!(rotated.position(), PiecePosition::new(2, 10));
        assert_eq!(rotated.shape().width(), 4);
    }

    #[test]
    fn test_rotation_failure_returns_none() {
        // A vertical I in a one-column well cannot rotate anywhere.
        let board = Board::from_ascii(
            "
            LLLL.JJJJJ
            LLLL.JJJJJ
            LLLL.JJJJJ
            LLLL.JJJJJ
            ",
        );
        let vertical = Piece::with_shape(
            PieceShape::spawn(PieceKind::I).rotated_right(),
            PiecePosition::new(4, 16),
        );
        assert!(!board.collides(&vertical));
        assert_eq!(vertical.rotated_with_kick(&board), None);
    }

    #[test]
    fn test_drop_position() {
        let board = Board::EMPTY;
        let piece = Piece::spawn(PieceKind::O);
        let (dropped, rows) = piece.drop_position(&board);
        assert_eq!(rows, 18);
        assert_eq!(dropped.position(), PiecePosition::new(4, 18));
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::spawn(PieceKind::S).rotated_right().shifted(1, 7);
        assert_eq!(piece.shape().rotation().quarter_turns(), 1);

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@5,7\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"SS#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());
    }

    #[test]
    fn test_uniform_draw_produces_every_kind() {
        use rand::SeedableRng as _;

        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let mut seen = [0_usize; PieceKind::LEN];
        for _ in 0..7000 {
            let kind: PieceKind = rng.random();
            seen[kind as usize] += 1;
        }
        for (kind, count) in PieceKind::ALL.iter().zip(seen) {
            assert!((700..1300).contains(&count), "{kind:?} drawn {count} times");
        }
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
