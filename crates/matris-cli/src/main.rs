mod command;
mod cue;
mod highscore;
mod tui;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
