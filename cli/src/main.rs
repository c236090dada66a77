//! Console tic-tac-toe against the MCTS engine.
//!
//! Owns the board and the per-game search tree, alternating human and
//! engine moves. The tree persists across plies: after every move the
//! driver advances the root past the played square, so the engine's next
//! search starts from the statistics it already gathered. When the human
//! plays into a branch the tree never expanded, the driver falls back to a
//! fresh tree and the shorter search budget.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use mcts::{Budget, SearchConfig, SearchTree, Searcher};
use tictactoe::{Alliance, Board};

#[derive(Parser, Debug)]
#[command(name = "tictactoe-cli", about = "Play tic-tac-toe against a Monte-Carlo tree search engine")]
struct Args {
    /// Side the engine plays (x moves first).
    #[arg(long, default_value = "x", value_parser = parse_alliance)]
    engine_plays: Alliance,

    /// RNG seed; seeded from OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Search budget in milliseconds for a fresh per-move tree.
    #[arg(long, default_value_t = 100)]
    fast_budget_ms: u64,

    /// Search budget in milliseconds when a persisted tree is reused.
    #[arg(long, default_value_t = 500)]
    slow_budget_ms: u64,

    /// Log level filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_alliance(s: &str) -> Result<Alliance, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut rng = match args.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    let config = SearchConfig::default().with_budgets(
        Duration::from_millis(args.fast_budget_ms),
        Duration::from_millis(args.slow_budget_ms),
    );
    info!(engine_plays = %args.engine_plays, ?config, "starting");
    let searcher = Searcher::new(config);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut board = Board::new();

    loop {
        play_game(&searcher, args.engine_plays, &mut board, &mut rng, &mut lines)?;
        board.reset();
        println!("\nplay again? (y/n)");
        match read_line(&mut lines)? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}

/// Run one game to completion and announce the result.
fn play_game(
    searcher: &Searcher,
    engine: Alliance,
    board: &mut Board,
    rng: &mut ChaCha20Rng,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    let human = !engine;
    let mut to_move = Alliance::X;
    // The root represents the current position, owned by the side that
    // just moved; at game start nobody has, so it stands in for the
    // engine's opponent on the first search.
    let mut tree = SearchTree::new(!to_move);
    let mut fresh_tree = true;

    loop {
        println!("\n{board}");
        if board.has_victory(engine) {
            println!("\nI win!");
            break;
        }
        if board.has_victory(human) {
            println!("\nYou win!");
            break;
        }
        if board.is_full() {
            println!("\nTie!");
            break;
        }

        if to_move == engine {
            let budget = if fresh_tree { Budget::Fast } else { Budget::Slow };
            let report = searcher.search(board, &mut tree, budget, rng);
            board.mark(engine, report.square);
            fresh_tree = !tree.advance(report.square);
            println!(
                "\nI take square {} ({:.3}s, {} iterations)",
                report.square + 1,
                report.elapsed.as_secs_f64(),
                report.iterations
            );
            debug!(value = report.value, fresh_tree, "engine moved");
        } else {
            let Some(square) = prompt_move(board, lines)? else {
                // Input closed; treat it as quitting mid-game.
                return Ok(());
            };
            board.mark(human, square);
            if tree.advance(square) {
                fresh_tree = false;
            } else {
                tree = SearchTree::new(human);
                fresh_tree = true;
            }
        }
        to_move = !to_move;
    }

    Ok(())
}

/// Prompt until the human names an empty square, as 1-9 on this layout:
///
/// ```text
/// 1 2 3
/// 4 5 6
/// 7 8 9
/// ```
fn prompt_move(
    board: &Board,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<u8>> {
    loop {
        println!("\nMake a move (1-9)\n1 2 3\n4 5 6\n7 8 9");
        print!(">>_");
        io::stdout().flush().context("flushing prompt")?;

        let Some(line) = read_line(lines)? else {
            return Ok(None);
        };
        let Ok(choice) = line.trim().parse::<u8>() else {
            continue;
        };
        if !(1..=9).contains(&choice) {
            continue;
        }
        let square = choice - 1;
        if board.empty_square(square) {
            return Ok(Some(square));
        }
    }
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line.context("reading input")?)),
        None => Ok(None),
    }
}
