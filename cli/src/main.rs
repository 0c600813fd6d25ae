//! Interactive tic-tac-toe front end for the MCTS engine.
//!
//! Two modes:
//! - `self-play`: spectate the agent playing against itself under a wall-clock
//!   budget, with per-move statistics and a search-tree dump
//! - `play`: play against the agent, which searches under a simulation budget

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_core::{GameState, Outcome, Player};
use games_tictactoe::TicTacToe;
use mcts::{Mcts, MctsConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

#[derive(Parser)]
#[command(name = "mcts-cli", about = "Tic-tac-toe with a Monte Carlo Tree Search agent")]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Seed for the agent's rollout rng; omit for a fresh seed per run
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the agent play against itself
    SelfPlay {
        /// Wall-clock search budget per move, in milliseconds
        #[arg(long, default_value_t = 1000)]
        time_limit_ms: u64,

        /// Depth of the search-tree dump printed after each move
        #[arg(long, default_value_t = 1)]
        tree_depth: u32,
    },
    /// Play against the agent
    Play {
        /// Simulation budget per agent move
        #[arg(long, default_value_t = 500)]
        simulations: u32,

        /// Take the first move (play X) instead of responding as O
        #[arg(long)]
        play_first: bool,
    },
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::SelfPlay {
            time_limit_ms,
            tree_depth,
        } => self_play(Duration::from_millis(time_limit_ms), tree_depth, cli.seed),
        Command::Play {
            simulations,
            play_first,
        } => play(simulations, play_first, cli.seed),
    }
}

fn make_engine(state: TicTacToe, config: MctsConfig, seed: Option<u64>) -> Result<Mcts<TicTacToe>> {
    let engine = match seed {
        Some(seed) => Mcts::with_rng(state, config, ChaCha20Rng::seed_from_u64(seed)),
        None => Mcts::new(state, config),
    };
    engine.context("failed to configure the search engine")
}

fn piece(player: Player) -> char {
    match player {
        Player::First => 'X',
        Player::Second => 'O',
    }
}

fn announce_result(state: &TicTacToe) {
    match state.result() {
        Some(Outcome::Draw) => println!("Draw!"),
        Some(outcome) => {
            // winner() is Some for both win outcomes
            if let Some(winner) = outcome.winner() {
                println!("{} wins!", piece(winner));
            }
        }
        None => {}
    }
}

fn self_play(time_limit: Duration, tree_depth: u32, seed: Option<u64>) -> Result<()> {
    let mut state = TicTacToe::new();
    let mut ply = 0u64;

    while !state.is_terminal() {
        let config = MctsConfig::timed(time_limit);
        let mut engine = make_engine(state, config, seed.map(|s| s ^ ply))?;
        let mv = engine.search().context("search failed")?;

        let stats = engine.stats();
        info!(ply, mv, simulations = stats.simulations, "move chosen");

        println!("{state}");
        println!("{} plays {mv}", piece(state.to_move()));
        println!("Total simulations: {}", stats.simulations);
        println!(
            "X wins: {}  O wins: {}  Draws: {}",
            stats.first_player_wins, stats.second_player_wins, stats.draws
        );
        println!("{}", engine.render_tree(tree_depth));

        state = state.apply(mv);
        ply += 1;
    }

    println!("{state}");
    announce_result(&state);
    Ok(())
}

fn play(simulations: u32, play_first: bool, seed: Option<u64>) -> Result<()> {
    let human = if play_first {
        Player::First
    } else {
        Player::Second
    };
    let mut state = TicTacToe::new();
    let mut ply = 0u64;

    while !state.is_terminal() {
        println!("{state}");
        let mv = if state.to_move() == human {
            prompt_move(&state)?
        } else {
            let config = MctsConfig::simulations(simulations);
            let mut engine = make_engine(state, config, seed.map(|s| s ^ ply))?;
            let mv = engine.search().context("search failed")?;
            println!("{} plays {mv}", piece(state.to_move()));
            mv
        };
        state = state.apply(mv);
        ply += 1;
    }

    println!("{state}");
    announce_result(&state);
    Ok(())
}

/// Read a move from stdin until it parses and is legal in `state`.
fn prompt_move(state: &TicTacToe) -> Result<u8> {
    let legal = state.legal_moves();
    loop {
        print!("Enter move (0-8) for {}: ", piece(state.to_move()));
        io::stdout().flush().context("failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        anyhow::ensure!(read > 0, "stdin closed before the game ended");

        match line.trim().parse::<u8>() {
            Ok(mv) if legal.contains(&mv) => return Ok(mv),
            Ok(mv) => println!("Square {mv} is not available."),
            Err(_) => println!("Enter a number between 0 and 8."),
        }
    }
}
