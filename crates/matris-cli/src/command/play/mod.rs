use std::{io, path::PathBuf};

use matris_engine::{DropIntervalPolicy, PieceSeed};

use crate::{
    command::play::app::{PlayApp, PlayConfig},
    cue::{CueSink, Silent, TerminalBell},
    highscore::HighscoreStore,
    tui::Tui,
};

mod app;
mod screens;

/// Gravity speed-up policy.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Speed {
    /// 1000ms per row at level 1, 5ms faster per level, never below 100ms
    #[default]
    Linear,
    /// 1000ms per row at every level
    Fixed,
}

impl Speed {
    fn policy(self) -> DropIntervalPolicy {
        match self {
            Speed::Linear => DropIntervalPolicy::LINEAR,
            Speed::Fixed => DropIntervalPolicy::FIXED,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Player name shown on the start screen
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Seed for the piece sequence (32 hex digits); random when omitted
    #[arg(long)]
    pub(crate) seed: Option<PieceSeed>,
    /// How gravity speeds up with the level (linear or fixed)
    #[arg(long, default_value = "linear")]
    pub(crate) speed: Speed,
    #[command(flatten)]
    pub(crate) files: HighscoreFiles,
    /// Ring the terminal bell on line clears, level ups, and game over
    #[arg(long)]
    pub(crate) bell: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighscoreFiles {
    /// Highscore file
    #[arg(long, default_value = "./highscores.json")]
    highscore_file: PathBuf,
    /// Copy of the highscores used when the highscore file cannot be read
    #[arg(long, default_value_os_t = default_fallback_file())]
    fallback_file: PathBuf,
}

impl Default for HighscoreFiles {
    fn default() -> Self {
        Self {
            highscore_file: PathBuf::from("./highscores.json"),
            fallback_file: default_fallback_file(),
        }
    }
}

impl HighscoreFiles {
    pub(crate) fn store(&self) -> HighscoreStore {
        HighscoreStore::new(self.highscore_file.clone(), self.fallback_file.clone())
    }
}

fn default_fallback_file() -> PathBuf {
    std::env::temp_dir().join("matris-highscores.json")
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        name,
        seed,
        speed,
        files,
        bell,
    } = arg;

    let cues: Box<dyn CueSink> = if *bell {
        Box::new(TerminalBell::new(io::stdout()))
    } else {
        Box::new(Silent)
    };
    let config = PlayConfig {
        name: name.clone().unwrap_or_default(),
        seed: *seed,
        policy: speed.policy(),
    };

    let mut app = PlayApp::new(config, files.store(), cues);
    Tui::new().run(&mut app)?;

    for warning in app.warnings() {
        eprintln!("Warning: {warning:#}");
    }
    for (name, result) in app.results() {
        eprintln!(
            "{name}: score {}, level {}, lines {}",
            result.score, result.level, result.lines
        );
    }

    Ok(())
}
