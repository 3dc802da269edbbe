use gridpop_engine::{Action, Game, PieceSeed};

use crate::{storage::FileStorage, tui::Tui};

use self::app::PlayApp;

mod app;
mod input;

#[derive(Default, Debug, Clone, clap::Args)]
pub struct PlayArg {
    /// Start a game right away instead of waiting for Enter
    #[clap(long)]
    start: bool,
    /// Fixed piece sequence, for practising the same deal
    #[clap(long)]
    seed: Option<u64>,
}

pub fn run(arg: &PlayArg, storage: FileStorage) -> anyhow::Result<()> {
    let mut game = match arg.seed {
        Some(seed) => Game::with_seed(storage, PieceSeed::from_u64(seed)),
        None => Game::new(storage),
    };
    if arg.start {
        game.dispatch(Action::Start);
    }

    let mut app = PlayApp::new(game);
    Tui::new().run(&mut app)?;

    let mut game = app.into_game();
    if let Some(e) = game.storage_mut().take_error() {
        eprintln!(
            "Warning: failed to save to {}: {e:#}",
            game.storage().dir().display()
        );
    }
    Ok(())
}
