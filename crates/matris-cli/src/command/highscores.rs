use crate::command::play::HighscoreFiles;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct HighscoresArg {
    #[command(flatten)]
    files: HighscoreFiles,
}

pub(crate) fn run(arg: &HighscoresArg) {
    let table = arg.files.store().load();
    if table.is_empty() {
        println!("No highscores yet.");
        return;
    }
    for (rank, entry) in table.entries().iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>8}  level {:>3}  lines {:>4}  {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            entry.lines,
            entry.date.format("%Y-%m-%d %H:%M"),
        );
    }
}
