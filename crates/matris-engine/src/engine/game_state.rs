use std::{mem, time::Duration};

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::core::{board::Board, piece::Piece, piece::PieceKind};

use super::{
    event::{GameEvent, HorizontalDirection, InputAction},
    game_stats::GameStats,
    level::DropIntervalPolicy,
    piece_generator::{PieceGenerator, PieceSeed},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    /// No piece has been spawned yet.
    Ready,
    /// A piece is falling.
    Falling,
    /// A spawned piece collided; the game has ended.
    GameOver,
}

/// Final figures of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: usize,
    pub level: usize,
    pub lines: usize,
}

/// Result of a downward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece was locked, clearing `cleared_lines` rows.
    Locked { cleared_lines: usize },
    /// There was no falling piece.
    Inactive,
}

/// A single game: board, falling piece, statistics, and gravity.
///
/// `GameState` is driven from outside. The front-end forwards player input
/// through [`apply`](Self::apply) (or the individual operations) and elapsed
/// time through [`tick`](Self::tick), then reads the state back for
/// rendering and drains [`GameEvent`]s for sound cues.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use matris_engine::{GameState, InputAction};
///
/// let mut game = GameState::new();
/// game.spawn();
/// assert!(game.phase().is_falling());
///
/// game.apply(InputAction::MoveLeft);
/// game.apply(InputAction::HardDrop);
/// game.tick(Duration::from_millis(16));
///
/// assert_eq!(game.stats().completed_pieces(), 1);
/// assert!(game.drain_events().iter().any(|e| e.is_drop()));
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    seed: PieceSeed,
    board: Board,
    active: Option<Piece>,
    next: Option<PieceKind>,
    generator: PieceGenerator,
    stats: GameStats,
    phase: GamePhase,
    paused: bool,
    drop_policy: DropIntervalPolicy,
    drop_interval: Duration,
    drop_counter: Duration,
    events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a game with a random seed and the default drop interval policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_policy(seed, DropIntervalPolicy::default())
    }

    #[must_use]
    pub fn with_policy(seed: PieceSeed, drop_policy: DropIntervalPolicy) -> Self {
        let stats = GameStats::new();
        Self {
            seed,
            board: Board::EMPTY,
            active: None,
            next: None,
            generator: PieceGenerator::with_seed(seed),
            drop_interval: drop_policy.interval(stats.level()),
            stats,
            phase: GamePhase::Ready,
            paused: false,
            drop_policy,
            drop_counter: Duration::ZERO,
            events: vec![],
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, if any.
    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// Returns the kind that the next spawn will use.
    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the current gravity interval.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Returns the final figures once the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.phase.is_game_over().then(|| GameResult {
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
        })
    }

    /// Takes all events queued since the previous call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Places the next piece at the top of the board.
    ///
    /// The pending next kind is used (one is drawn on the first call) and a
    /// fresh next kind is drawn. If the new piece collides, the game is over
    /// and the board is left untouched. Does nothing once the game is over.
    pub fn spawn(&mut self) {
        if self.phase.is_game_over() {
            return;
        }
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.generator.next_kind(),
        };
        self.next = Some(self.generator.next_kind());

        let piece = Piece::spawn(kind);
        self.drop_counter = Duration::ZERO;
        if self.board.collides(&piece) {
            self.active = None;
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            return;
        }
        self.active = Some(piece);
        self.phase = GamePhase::Falling;
    }

    /// Shifts the falling piece one column if the target is free.
    ///
    /// Returns whether the piece moved.
    pub fn move_horizontal(&mut self, direction: HorizontalDirection) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let moved = piece.shifted(direction.dx(), 0);
        if self.board.collides(&moved) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Moves the falling piece down one row, locking it if it cannot move.
    ///
    /// Resets the gravity accumulator either way. A soft drop earns no points.
    pub fn soft_drop(&mut self) -> DropOutcome {
        let Some(piece) = self.active else {
            return DropOutcome::Inactive;
        };
        self.drop_counter = Duration::ZERO;
        let moved = piece.down();
        if self.board.collides(&moved) {
            let cleared_lines = self.lock(piece);
            return DropOutcome::Locked { cleared_lines };
        }
        self.active = Some(moved);
        DropOutcome::Moved
    }

    /// Drops the falling piece to the lowest free position and locks it.
    ///
    /// Earns the hard drop bonus for every row descended.
    pub fn hard_drop(&mut self) -> DropOutcome {
        let Some(piece) = self.active else {
            return DropOutcome::Inactive;
        };
        let (dropped, rows) = piece.drop_position(&self.board);
        self.stats.add_hard_drop_bonus(rows);
        let cleared_lines = self.lock(dropped);
        DropOutcome::Locked { cleared_lines }
    }

    /// Rotates the falling piece clockwise with a simplified wall kick.
    ///
    /// Returns whether the piece rotated. The O-piece never rotates.
    pub fn rotate(&mut self) -> bool {
        let Some(rotated) = self
            .active
            .and_then(|piece| piece.rotated_with_kick(&self.board))
        else {
            return false;
        };
        self.active = Some(rotated);
        self.events.push(GameEvent::Rotate);
        true
    }

    /// Advances gravity by `elapsed`.
    ///
    /// Once the accumulated time exceeds the drop interval the piece steps
    /// down one row. Nothing happens while paused or when no piece is falling.
    pub fn tick(&mut self, elapsed: Duration) -> Option<DropOutcome> {
        if self.paused || !self.phase.is_falling() {
            return None;
        }
        self.drop_counter += elapsed;
        (self.drop_counter > self.drop_interval).then(|| self.soft_drop())
    }

    /// Toggles the pause flag. Only a falling game can be paused.
    ///
    /// Returns whether the flag changed.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.phase.is_falling() {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Applies one player input.
    ///
    /// Everything but [`InputAction::TogglePause`] is ignored while paused.
    /// Returns whether the input had an effect.
    pub fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::TogglePause => self.toggle_pause(),
            _ if self.paused => false,
            InputAction::MoveLeft => self.move_horizontal(HorizontalDirection::Left),
            InputAction::MoveRight => self.move_horizontal(HorizontalDirection::Right),
            InputAction::SoftDrop => !self.soft_drop().is_inactive(),
            InputAction::HardDrop => !self.hard_drop().is_inactive(),
            InputAction::Rotate => self.rotate(),
        }
    }

    fn lock(&mut self, piece: Piece) -> usize {
        self.board.merge(&piece);
        self.active = None;
        self.events.push(GameEvent::Drop);

        let cleared_lines = self.board.sweep_completed_rows();
        let outcome = self.stats.complete_piece_drop(cleared_lines);
        if cleared_lines > 0 {
            self.events.push(GameEvent::LineClear {
                rows: cleared_lines,
            });
        }
        if let Some(level) = outcome.level_up {
            self.events.push(GameEvent::LevelUp { level });
            self.drop_interval = self.drop_policy.interval(level);
        }

        self.spawn();
        cleared_lines
    }
}
