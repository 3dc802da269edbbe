use std::{env, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::storage::FileStorage;

use self::{keys::KeysArg, play::PlayArg, simulate::SimulateArg};

mod keys;
mod play;
mod scores;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding settings and high scores [default: $HOME/.gridpop]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Show the high scores of every mode
    Scores,
    /// Show or change the key bindings
    Keys(#[clap(flatten)] KeysArg),
    /// Play random games without a terminal and report the results as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

impl CommandArgs {
    fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".gridpop"),
            None => PathBuf::from(".gridpop"),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let data_dir = args.data_dir();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg, FileStorage::open(data_dir)?)?,
        Mode::Scores => scores::run(&FileStorage::open(data_dir)?),
        Mode::Keys(arg) => keys::run(&arg, FileStorage::open(data_dir)?)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
