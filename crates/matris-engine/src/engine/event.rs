/// Notable things that happened inside the engine.
///
/// Events queue up in [`GameState`](super::GameState) and are handed to the
/// driver by [`drain_events`](super::GameState::drain_events), typically to
/// trigger sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// A piece was locked.
    Drop,
    /// The falling piece rotated.
    Rotate,
    /// One lock cleared `rows` rows.
    LineClear { rows: usize },
    /// The level increased to `level`.
    LevelUp { level: usize },
    /// A new piece could not be placed.
    GameOver,
}

impl GameEvent {
    /// Returns the name of the audio cue associated with this event.
    ///
    /// ```
    /// use matris_engine::GameEvent;
    ///
    /// assert_eq!(GameEvent::LineClear { rows: 2 }.cue_name(), "lineclear");
    /// ```
    #[must_use]
    pub const fn cue_name(&self) -> &'static str {
        match self {
            GameEvent::Drop => "drop",
            GameEvent::Rotate => "rotate",
            GameEvent::LineClear { .. } => "lineclear",
            GameEvent::LevelUp { .. } => "levelup",
            GameEvent::GameOver => "gameover",
        }
    }
}

/// A discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    TogglePause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
}

impl HorizontalDirection {
    #[must_use]
    pub const fn dx(self) -> i16 {
        match self {
            HorizontalDirection::Left => -1,
            HorizontalDirection::Right => 1,
        }
    }
}
