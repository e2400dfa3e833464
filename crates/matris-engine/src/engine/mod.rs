//! Game rules built on top of the core data structures.
//!
//! - [`GameState`] - one game: board, falling piece, gravity, and phase
//! - [`GameStats`] - score, level, and line counters
//! - [`DropIntervalPolicy`] - how gravity speeds up with the level
//! - [`PieceGenerator`] / [`PieceSeed`] - deterministic uniform piece draws
//! - [`GameEvent`] - cues emitted for the front-end
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] and call [`GameState::spawn`]
//! 2. Forward player input with [`GameState::apply`] and elapsed time with
//!    [`GameState::tick`]
//! 3. A piece that can no longer fall is locked, full rows are cleared,
//!    points are awarded, and the next piece spawns
//! 4. The game ends when a new piece collides at its spawn position
//!
//! # Example
//!
//! ```
//! use matris_engine::{GameState, PieceSeed};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut game = GameState::with_seed(seed);
//! game.spawn();
//!
//! while !game.phase().is_game_over() {
//!     game.hard_drop();
//! }
//!
//! let result = game.result().unwrap();
//! assert!(result.score > 0);
//! ```

pub use self::{event::*, game_state::*, game_stats::*, level::*, piece_generator::*};

mod event;
mod game_state;
mod game_stats;
mod level;
mod piece_generator;
