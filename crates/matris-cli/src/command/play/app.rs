use std::time::Duration;

use chrono::Utc;
use crossterm::event::Event;
use matris_engine::{DropIntervalPolicy, GameResult, GameState, PieceSeed};
use rand::Rng as _;
use ratatui::Frame;

use crate::{
    command::play::screens::{Screen, StartScreen, Transition},
    cue::CueSink,
    highscore::{HighscoreEntry, HighscoreStore, HighscoreTable},
    tui::{App, RenderMode, Tui},
};

const FPS: u64 = 60;

#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Name prefilled on the start screen.
    pub name: String,
    /// Fixed piece seed; every game draws a fresh random seed when `None`.
    pub seed: Option<PieceSeed>,
    pub policy: DropIntervalPolicy,
}

/// State shared by all screens for the lifetime of the program.
#[derive(Debug)]
pub struct Session {
    config: PlayConfig,
    store: HighscoreStore,
    highscores: HighscoreTable,
    cues: Box<dyn CueSink>,
    warnings: Vec<anyhow::Error>,
    results: Vec<(String, GameResult)>,
}

impl Session {
    pub fn new(config: PlayConfig, store: HighscoreStore, cues: Box<dyn CueSink>) -> Self {
        let highscores = store.load();
        Self {
            config,
            store,
            highscores,
            cues,
            warnings: vec![],
            results: vec![],
        }
    }

    pub fn highscores(&self) -> &HighscoreTable {
        &self.highscores
    }

    pub fn cues(&mut self) -> &mut dyn CueSink {
        &mut *self.cues
    }

    /// Creates a game with the first piece already spawned.
    pub fn new_game(&self) -> GameState {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut game = GameState::with_policy(seed, self.config.policy);
        game.spawn();
        game
    }

    /// Records a finished game and returns its highscore rank, if any.
    ///
    /// The highscore files are only rewritten when the table changed; write
    /// failures are kept as warnings.
    pub fn record(&mut self, name: &str, result: GameResult) -> Option<usize> {
        self.results.push((name.to_owned(), result));
        let rank = self
            .highscores
            .insert(HighscoreEntry::new(name, result, Utc::now()));
        if rank.is_some() {
            self.warnings.extend(self.store.save(&self.highscores));
        }
        rank
    }
}

#[derive(Debug)]
pub struct PlayApp {
    screen: Screen,
    session: Session,
    should_exit: bool,
}

impl PlayApp {
    pub fn new(config: PlayConfig, store: HighscoreStore, cues: Box<dyn CueSink>) -> Self {
        let screen = Screen::Start(StartScreen::new(config.name.clone()));
        Self {
            screen,
            session: Session::new(config, store, cues),
            should_exit: false,
        }
    }

    pub fn warnings(&self) -> &[anyhow::Error] {
        &self.session.warnings
    }

    pub fn results(&self) -> &[(String, GameResult)] {
        &self.session.results
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Replace(screen) => self.screen = screen,
            Transition::Exit => self.should_exit = true,
        }
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS as f64);
        tui.set_render_mode(RenderMode::interval_from_rate(FPS as f64));
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let transition = self.screen.handle_event(&mut self.session, &event);
        self.apply_transition(transition);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(&self.session, frame);
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        let transition = self.screen.update(&mut self.session, elapsed);
        self.apply_transition(transition);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{fs, path::PathBuf, process};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::cue::Silent;

    pub(crate) const SEED: &str = "00112233445566778899aabbccddeeff";

    pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("matris-app-{}-{test_name}", process::id()));
        _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub(crate) fn session(dir: &std::path::Path) -> Session {
        let config = PlayConfig {
            name: String::new(),
            seed: Some(SEED.parse().unwrap()),
            policy: DropIntervalPolicy::FIXED,
        };
        let store = HighscoreStore::new(dir.join("highscores.json"), dir.join("fallback.json"));
        Session::new(config, store, Box::new(Silent))
    }

    pub(crate) fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_seeded_session_repeats_games() {
        let dir = temp_dir("seeded");
        let session = session(&dir);
        let a = session.new_game();
        let b = session.new_game();
        assert!(a.phase().is_falling());
        assert_eq!(a.active_piece(), b.active_piece());
        assert_eq!(a.next_piece(), b.next_piece());
        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_record_saves_only_ranked_results() {
        let dir = temp_dir("record");
        let mut session = session(&dir);
        let result = GameResult {
            score: 500,
            level: 1,
            lines: 2,
        };
        assert_eq!(session.record("alice", result), Some(0));
        assert!(session.warnings.is_empty());
        assert_eq!(session.results.len(), 1);

        let reloaded = HighscoreStore::new(dir.join("highscores.json"), dir.join("fallback.json"));
        assert_eq!(reloaded.load(), *session.highscores());
        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_app_flow_from_start_to_exit() {
        let dir = temp_dir("flow");
        let config = PlayConfig {
            name: "bob".to_owned(),
            seed: Some(SEED.parse().unwrap()),
            policy: DropIntervalPolicy::FIXED,
        };
        let store = HighscoreStore::new(dir.join("highscores.json"), dir.join("fallback.json"));
        let mut app = PlayApp::new(config, store, Box::new(Silent));
        let mut tui = Tui::new();

        assert!(app.screen.is_start());
        app.handle_event(&mut tui, key(KeyCode::Enter));
        assert!(app.screen.is_play());

        while app.screen.is_play() {
            app.handle_event(&mut tui, key(KeyCode::Char(' ')));
        }
        assert!(app.screen.is_game_over());
        assert_eq!(app.results().len(), 1);
        assert_eq!(app.results()[0].0, "bob");
        assert!(app.warnings().is_empty());

        app.handle_event(&mut tui, key(KeyCode::Enter));
        assert!(app.screen.is_start());
        app.handle_event(&mut tui, key(KeyCode::Esc));
        assert!(app.should_exit());
        _ = fs::remove_dir_all(&dir);
    }
}
