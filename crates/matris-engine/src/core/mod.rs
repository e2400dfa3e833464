//! Core data structures: pieces, shapes, and the board.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;
