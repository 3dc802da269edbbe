use std::{path::PathBuf, time::Duration};

use gridpop_engine::{
    Action, Game, GameState, GridSize, MemoryStorage, PieceSeed, Position, RotationDirection,
};
use rand::{Rng, SeedableRng as _, rngs::StdRng};
use serde::Serialize;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub struct SimulateArg {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u64,
    /// Base seed; game `i` uses `seed + i` [default: random]
    #[arg(long)]
    seed: Option<u64>,
    /// Grid side length (4 or 5)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(4..=5))]
    grid_size: u8,
    /// Play without the countdown
    #[arg(long)]
    untimed: bool,
    /// Longest simulated thinking time per move; slower moves run out the countdown
    #[arg(long, default_value_t = 3000)]
    max_think_ms: u64,
    /// Stop a game after this many turns even if it is not over
    #[arg(long, default_value_t = 1000)]
    max_turns: u32,
    /// Output file path for the JSON summary [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationSummary {
    base_seed: u64,
    grid_size: GridSize,
    timed: bool,
    games: Vec<GameSummary>,
    best_score: u64,
    mean_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameSummary {
    seed: PieceSeed,
    score: u64,
    level: u32,
    turns: u32,
    lines_cleared: u32,
    /// Placements made by the player; the rest were forced by the countdown.
    placements: u32,
    game_over: bool,
}

pub fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let base_seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let grid_size = GridSize::try_from(arg.grid_size)?;
    let timed = !arg.untimed;

    eprintln!(
        "Simulating {} games on {grid_size} ({}), base seed {base_seed}...",
        arg.games,
        if timed { "timed" } else { "untimed" },
    );

    let mut games = vec![];
    for i in 0..arg.games {
        let seed = base_seed.wrapping_add(i);
        let summary = play_game(arg, grid_size, timed, seed);
        eprintln!(
            "  game {}/{}: score {}, level {}, {} turns{}",
            i + 1,
            arg.games,
            summary.score,
            summary.level,
            summary.turns,
            if summary.game_over { "" } else { " (turn limit)" },
        );
        games.push(summary);
    }

    let best_score = games.iter().map(|g| g.score).max().unwrap_or(0);
    #[expect(clippy::cast_precision_loss)]
    let mean_score = if games.is_empty() {
        0.0
    } else {
        games.iter().map(|g| g.score as f64).sum::<f64>() / games.len() as f64
    };
    eprintln!("Best score {best_score}, mean {mean_score:.1}");

    let summary = SimulationSummary {
        base_seed,
        grid_size,
        timed,
        games,
        best_score,
        mean_score,
    };
    Output::save_json(&summary, arg.output.clone())
}

fn play_game(arg: &SimulateArg, grid_size: GridSize, timed: bool, seed: u64) -> GameSummary {
    let piece_seed = PieceSeed::from_u64(seed);
    let mut game = Game::with_seed(MemoryStorage::new(), piece_seed);
    game.dispatch(Action::ChangeGridSize(grid_size));
    game.dispatch(Action::ToggleTimed(timed));
    game.dispatch(Action::Start);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut placements = 0;
    while game.state().is_playing() && game.state().turns_played() < arg.max_turns {
        let turns = game.state().turns_played();
        game.advance(Duration::from_millis(rng.random_range(0..=arg.max_think_ms)));
        if game.state().turns_played() != turns || !game.state().is_playing() {
            continue;
        }
        if play_turn(&mut game, &mut rng) {
            placements += 1;
        }
    }

    let state = game.state();
    GameSummary {
        seed: piece_seed,
        score: state.score(),
        level: state.level(),
        turns: state.turns_played(),
        lines_cleared: state.lines_cleared(),
        placements,
        game_over: state.is_game_over(),
    }
}

/// Makes one random move: sometimes a hold, otherwise a random rotation and
/// a random valid spot. Returns whether a piece was placed.
fn play_turn<R>(game: &mut Game<MemoryStorage>, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    if game.state().can_hold() && rng.random_ratio(1, 10) {
        game.dispatch(Action::Hold);
        return false;
    }

    for _ in 0..rng.random_range(0..4) {
        game.dispatch(Action::Rotate(RotationDirection::Clockwise));
    }
    for _ in 0..4 {
        let candidates = valid_positions(game.state());
        if !candidates.is_empty() {
            let target = candidates[rng.random_range(0..candidates.len())];
            let turns = game.state().turns_played();
            game.dispatch(Action::Move(target));
            game.dispatch(Action::Place);
            return game.state().turns_played() != turns;
        }
        game.dispatch(Action::Rotate(RotationDirection::Clockwise));
    }

    // The piece fits nowhere, so the time-out search ends the game.
    game.dispatch(Action::AutoPlace);
    false
}

fn valid_positions(state: &GameState) -> Vec<Position> {
    let Some(piece) = state.current_piece() else {
        return vec![];
    };
    let side = i32::try_from(state.grid().side()).unwrap_or(i32::MAX);
    (-3..side)
        .flat_map(|y| (-3..side).map(move |x| Position::new(x, y)))
        .filter(|&position| state.grid().is_valid_at(piece, position))
        .collect()
}
