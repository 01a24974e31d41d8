use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Per-day task planner.
/// Storage defaults to ~/.dayplanner/days.json, the config file, or --db.
#[derive(Parser)]
#[command(name = "dp", version, about = "Plan your day one task at a time")]
pub struct Cli {
    /// Path to the JSON planner file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
