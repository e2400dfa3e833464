use clap::{Parser, Subcommand};

use self::{highscores::HighscoresArg, play::PlayArg};

mod highscores;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play the game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the highscore table
    Highscores(#[clap(flatten)] HighscoresArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Highscores(arg) => highscores::run(&arg),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_play() {
        let args = CommandArgs::try_parse_from(["matris"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_parse_play_options() {
        let args = CommandArgs::try_parse_from([
            "matris",
            "play",
            "--name",
            "alice",
            "--seed",
            "0123456789abcdeffedcba9876543210",
            "--speed",
            "fixed",
            "--bell",
        ])
        .unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(arg.name.as_deref(), Some("alice"));
        assert_eq!(
            arg.seed.unwrap().to_string(),
            "0123456789abcdeffedcba9876543210"
        );
        assert_eq!(arg.speed, play::Speed::Fixed);
        assert!(arg.bell);
    }

    #[test]
    fn test_reject_bad_seed() {
        assert!(CommandArgs::try_parse_from(["matris", "play", "--seed", "xyz"]).is_err());
    }
}
