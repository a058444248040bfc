//! Ember CLI - Command-line interface for the Ember engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, simulate};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Headless tools for the Ember 2D engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a particle scene without a window and report emitter statistics
    Simulate {
        /// Path to scene file
        scene: String,

        /// Number of frames to simulate (defaults to the scene's value)
        #[arg(long)]
        frames: Option<u64>,

        /// Simulation rate in frames per second (defaults to the scene's value)
        #[arg(long)]
        fps: Option<f64>,

        /// Override every emitter's random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Parse and validate a particle scene
    Check {
        /// Path to scene file
        scene: String,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            scene,
            frames,
            fps,
            seed,
        } => simulate::run(simulate::SimulateArgs {
            scene,
            frames,
            fps,
            seed,
        }),
        Commands::Check { scene } => check::run(&scene),
    }
}
