//! Tengen: Go rules engine with a minimax player.
//!
//! ## Usage
//!
//! - `tengen` - Show a demo game
//! - `tengen gtp` - Start GTP server for GUI integration
//! - `tengen demo` - Searcher (black) against a random player (white)

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tengen::constants::{COMPLEXITY_BUDGET, DEFAULT_SIZE, MAX_SEARCH_DEPTH, MAX_SIZE, MIN_SIZE};
use tengen::eval::HeuristicEvaluator;
use tengen::game::Game;
use tengen::gtp::GtpEngine;
use tengen::player::{Player, RandomPlayer};
use tengen::point::Color;
use tengen::search::{SearchConfig, Searcher};

/// Tengen: a Go engine with alpha-beta minimax search
#[derive(Parser)]
#[command(name = "tengen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp(EngineArgs),
    /// Play the searcher against a random player
    Demo {
        #[command(flatten)]
        engine: EngineArgs,
        /// Stop after this many moves
        #[arg(long, default_value_t = 200)]
        moves: usize,
        /// Print the final position as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Board size
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,
    /// Random seed; a fresh one is drawn when absent
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum search depth
    #[arg(long, default_value_t = MAX_SEARCH_DEPTH)]
    max_depth: usize,
    /// Budget on the estimated number of searched lines
    #[arg(long, default_value_t = COMPLEXITY_BUDGET)]
    budget: u64,
}

impl Default for EngineArgs {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: None,
            max_depth: MAX_SEARCH_DEPTH,
            budget: COMPLEXITY_BUDGET,
        }
    }
}

impl EngineArgs {
    fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            bail!("board size must be between {MIN_SIZE} and {MAX_SIZE}, got {}", self.size);
        }
        if self.max_depth == 0 {
            bail!("max depth must be at least 1");
        }
        Ok(())
    }

    fn config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            complexity_budget: self.budget,
            ..SearchConfig::default()
        }
    }

    fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.log_level);

    match cli.command {
        Some(Commands::Gtp(args)) => {
            args.validate()?;
            let mut engine = GtpEngine::new(
                args.size,
                HeuristicEvaluator::default(),
                args.config(),
                args.rng(),
            );
            engine.run(std::io::stdin().lock(), std::io::stdout().lock())
        }
        Some(Commands::Demo {
            engine,
            moves,
            json,
        }) => run_demo(&engine, moves, json),
        None => run_demo(&EngineArgs::default(), 200, false),
    }
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn run_demo(args: &EngineArgs, limit: usize, json: bool) -> Result<()> {
    args.validate()?;
    println!("Tengen: searcher (X) vs random (O) on {0}x{0}\n", args.size);

    let mut rng = args.rng();
    let mut black = Searcher::new(HeuristicEvaluator::default(), args.config(), rng.fork());
    let mut white = RandomPlayer::new(rng.fork());
    let mut game = Game::new(args.size);

    while !game.is_ended() && game.move_number() < limit {
        let Some(color) = game.turn() else {
            break;
        };
        let mv = match color {
            Color::Black => black.propose(&game),
            Color::White => white.propose(&game),
        };
        if !game.apply(mv) {
            bail!("{color} proposed illegal move {mv}");
        }
        println!("{:>3}. {color} {mv}", game.move_number());
    }

    println!("\n{}", game.board());
    let score = game.score();
    println!("Score: black {} white {}", score.black, score.white);
    match (game.is_ended(), game.winner()) {
        (true, Some(winner)) => println!("Winner: {winner}"),
        (true, None) => println!("Result: draw"),
        (false, _) => println!("Stopped after {limit} moves"),
    }
    info!(moves = game.move_number(), ?score, "demo finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&game.view())?);
    }
    Ok(())
}
