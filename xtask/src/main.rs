// Desktop tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod cargo;
mod sim;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Sky Clock development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the no_std crates, the emulator build, clippy and formatting
    Check,
    /// Run unit, integration and doc tests
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run the desktop emulator
    Sim {
        /// Seconds to run before printing the dashboard state
        #[arg(long, default_value_t = 75)]
        seconds: u64,
        /// Drop the simulated WiFi link after this many seconds
        #[arg(long)]
        drop_at: Option<u64>,
        /// Save the final frame as a PPM image
        #[arg(long)]
        screenshot: Option<std::path::PathBuf>,
        /// Log filter passed through RUST_LOG
        #[arg(long, default_value = "info")]
        log: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Sim {
            seconds,
            drop_at,
            screenshot,
            log,
        } => sim::run(&sim::SimOptions {
            seconds,
            drop_at,
            screenshot,
            log,
        }),
    }
}
