//! Command-line interface for the Swarmfall runner.

use std::path::PathBuf;

use clap::Parser;

/// Headless survival-arena simulation runner
#[derive(Parser, Debug)]
#[command(name = "swarmfall")]
#[command(about = "Headless survival-arena simulation runner")]
#[command(version)]
pub struct Args {
    /// JSON simulation config; defaults apply when omitted
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Override the config's RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seconds of simulated time to run
    #[arg(long, default_value = "60")]
    pub seconds: f32,

    /// Pace ticks at wall-clock rate on a game loop thread
    #[arg(long)]
    pub realtime: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log: String,
}

pub fn parse_args() -> Args {
    Args::parse()
}
