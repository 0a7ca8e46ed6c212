//! Headless Outbreak match runner.
//!
//! Runs the simulation without graphics for CI testing, balance
//! sweeps, and arena inspection.
//!
//! # Usage
//!
//! ```bash
//! # Run a single match and print its report as JSON
//! cargo run -p outbreak_headless -- run --seed 7
//!
//! # Watch a match as ASCII frames
//! cargo run -p outbreak_headless -- run --seed 7 --ascii
//!
//! # Sweep 500 seeds in parallel and write a summary
//! cargo run -p outbreak_headless -- batch --count 500 --output results.json
//!
//! # Generate and inspect an arena
//! cargo run -p outbreak_headless -- arena --seed 3
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outbreak_core::prelude::{Arena, ArenaConfig, MatchSession, TICK_RATE};
use outbreak_headless::{
    ascii::{render_arena, render_session, AsciiConfig},
    batch::{run_batch, BatchConfig},
    runner::{run_match, RunConfig},
    scenario::MatchScenario,
    strategies::Strategy,
};

#[derive(Parser)]
#[command(name = "outbreak_headless")]
#[command(about = "Headless Outbreak match runner for CI and balance testing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single match and print its report
    Run {
        /// Match seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Scenario file (RON) overriding tunables and setup
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Policy driving human slots
        #[arg(long, default_value = "scripted")]
        strategy: Strategy,

        /// Hard tick budget
        #[arg(long, default_value = "60000")]
        max_ticks: u64,

        /// Print an ASCII frame every second of simulated time
        #[arg(long)]
        ascii: bool,
    },

    /// Run a batch of matches for balance testing
    Batch {
        /// Number of matches to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Starting seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Scenario file (RON) overriding tunables and setup
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Policy driving human slots
        #[arg(long, default_value = "scripted")]
        strategy: Strategy,

        /// Hard tick budget per match
        #[arg(long, default_value = "60000")]
        max_ticks: u64,

        /// Write the full summary as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an arena and render it as ASCII
    Arena {
        /// Generation seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries reports and frames.
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Run {
            seed,
            scenario,
            strategy,
            max_ticks,
            ascii,
        } => {
            let mut config = run_config(scenario.as_deref(), strategy, max_ticks)?;
            config.setup = config.setup.with_seed(seed);
            if ascii {
                run_with_frames(&config)?;
            } else {
                let report = run_match(&config)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Batch {
            count,
            seed,
            scenario,
            strategy,
            max_ticks,
            output,
        } => {
            let run = run_config(scenario.as_deref(), strategy, max_ticks)?;
            let config = BatchConfig {
                run,
                count,
                seed_start: seed,
            };
            let summary = run_batch(&config);
            println!(
                "games: {}  infected wins: {}  survivor wins: {}  unfinished: {}  failed: {}  \
                 infected win rate: {:.3}  mean ticks: {:.0}",
                summary.games,
                summary.infected_wins,
                summary.survivor_wins,
                summary.unfinished,
                summary.failed,
                summary.infected_win_rate(),
                summary.mean_ticks,
            );
            if let Some(path) = output {
                std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
                println!("summary written to {}", path.display());
            }
        }
        Commands::Arena { seed } => {
            let arena = Arena::generate(ArenaConfig::default().with_seed(seed))?;
            println!("{}", render_arena(&arena, AsciiConfig::default()));
            println!(
                "seed {seed}: {} obstacles, {} spawn points, all reachable",
                arena.obstacles().len(),
                arena.spawn_points().len()
            );
        }
    }
    Ok(())
}

fn run_config(
    scenario: Option<&std::path::Path>,
    strategy: Strategy,
    max_ticks: u64,
) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = match scenario {
        Some(path) => {
            let scenario = MatchScenario::load(path)?;
            RunConfig {
                tunables: scenario.tunables,
                setup: scenario.setup,
                ..RunConfig::default()
            }
        }
        None => RunConfig::default(),
    };
    config.strategy = strategy;
    config.max_ticks = max_ticks;
    Ok(config)
}

/// Run a match printing one ASCII frame per simulated second.
fn run_with_frames(config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    use rand::SeedableRng;

    let mut session = MatchSession::new(config.tunables, config.setup)?;
    let mut rng = rand_pcg::Pcg32::seed_from_u64(config.setup.seed);
    let frame_config = AsciiConfig::default();

    for tick in 0..config.max_ticks {
        let inputs =
            outbreak_headless::strategies::frame_inputs(&session, config.strategy, &mut rng);
        let events = session.tick(&inputs);
        if tick % u64::from(TICK_RATE) == 0 {
            println!("t = {:>5.1}s", session.elapsed_secs());
            println!("{}", render_session(&session, frame_config));
        }
        if let Some(state) = events.finished {
            println!("{}", render_session(&session, frame_config));
            println!("result: {state:?} after {} ticks", session.current_tick());
            return Ok(());
        }
    }
    println!("tick budget exhausted without a winner");
    Ok(())
}
