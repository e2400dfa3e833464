use serde::{Deserialize, Serialize};

use super::level::level_for_lines;

/// Points awarded per cleared row.
pub const LINE_SCORE: usize = 100;

/// Points awarded per row descended by a hard drop.
pub const HARD_DROP_SCORE: usize = 2;

/// Returns the points for clearing `cleared_lines` rows in one lock.
///
/// Each row is worth [`LINE_SCORE`], and a combo bonus of
/// `LINE_SCORE * n²` is added once when at least one row was cleared.
///
/// ```
/// use matris_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(0), 0);
/// assert_eq!(line_clear_score(1), 200);
/// assert_eq!(line_clear_score(4), 2000);
/// ```
#[must_use]
pub const fn line_clear_score(cleared_lines: usize) -> usize {
    if cleared_lines == 0 {
        return 0;
    }
    LINE_SCORE * cleared_lines + LINE_SCORE * cleared_lines * cleared_lines
}

/// What changed when a piece was locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub score_delta: usize,
    /// New level, if the lock crossed a level boundary.
    pub level_up: Option<usize>,
}

/// Game statistics: score, level, lines cleared, and piece count.
///
/// All counters are non-decreasing during a game.
///
/// # Example
///
/// ```
/// use matris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 2000);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the number of pieces locked so far.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index `n` counts locks that cleared `n` rows (0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> LockOutcome {
        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }

        let score_delta = line_clear_score(cleared_lines);
        self.score += score_delta;
        self.total_cleared_lines += cleared_lines;

        let level = level_for_lines(self.total_cleared_lines);
        let level_up = (level > self.level).then_some(level);
        self.level = level;

        LockOutcome {
            score_delta,
            level_up,
        }
    }

    /// Adds the hard drop bonus for descending `rows` rows.
    pub fn add_hard_drop_bonus(&mut self, rows: usize) {
        self.score += HARD_DROP_SCORE * rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 200);
        assert_eq!(line_clear_score(2), 600);
        assert_eq!(line_clear_score(3), 1200);
        assert_eq!(line_clear_score(4), 2000);
    }

    #[test]
    fn test_new_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_lock_without_clear() {
        let mut stats = GameStats::new();
        let outcome = stats.complete_piece_drop(0);
        assert_eq!(
            outcome,
            LockOutcome {
                score_delta: 0,
                level_up: None
            }
        );
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter()[0], 1);
    }

    #[test]
    fn test_level_up_reported_once() {
        let mut stats = GameStats::new();
        for _ in 0..2 {
            assert_eq!(stats.complete_piece_drop(4).level_up, None);
        }
        // 8 -> 12 lines
        assert_eq!(stats.complete_piece_drop(4).level_up, Some(2));
        assert_eq!(stats.complete_piece_drop(4).level_up, None);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_twenty_five_lines_reach_level_three() {
        let mut stats = GameStats::new();
        for _ in 0..6 {
            stats.complete_piece_drop(4);
        }
        stats.complete_piece_drop(1);
        assert_eq!(stats.total_cleared_lines(), 25);
        assert_eq!(stats.level(), 3);
        assert_eq!(stats.line_cleared_counter(), &[0, 1, 0, 0, 6]);
        assert_eq!(stats.score(), 6 * 2000 + 200);
    }

    #[test]
    fn test_hard_drop_bonus() {
        let mut stats = GameStats::new();
        stats.add_hard_drop_bonus(17);
        assert_eq!(stats.score(), 34);
        assert_eq!(stats.completed_pieces(), 0);
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);
        let json = serde_json::to_string(&stats).unwrap();
        let restored: GameStats = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, stats);
    }
}
