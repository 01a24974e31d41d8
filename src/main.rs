//! # dp - Day Planner CLI
//!
//! Plan each day as a chain of named tasks, tick them off, and look back at
//! how much of what you scheduled actually got done.
//!
//! ## Quick Start
//!
//! ```bash
//! # Schedule the morning
//! dp add "Read" --start 09:00 --duration 30
//! dp add "Walk" --duration 15          # starts at 09:30, where Read ends
//!
//! # Review and tick off
//! dp list
//! dp done 1
//!
//! # Look back
//! dp history
//! dp chart
//! ```
//!
//! ## Rules
//!
//! - A new task may not start before the previous task on that day ends.
//! - No task may run past midnight.
//! - Tasks ending at or after bedtime (22:00 by default) ask for confirmation.
//!
//! Data is stored in `~/.dayplanner/days.json` unless `--db` or the
//! `data_file` key of `~/.config/day-planner/config.toml` says otherwise.
//! Set `RUST_LOG=debug` for diagnostic output.

use clap::Parser;

use day_planner::config::PlannerConfig;
use day_planner::db::{JsonFileStorage, Storage};
use day_planner::store::DayStore;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let config = match PlannerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let rules = match config.chain_rules() {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let db_path = cli.db.unwrap_or_else(|| config.data_file());
    let storage = JsonFileStorage::new(&db_path);
    let days = match storage.load() {
        Ok(days) => days,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Refusing to continue so the planner file is not overwritten.");
            std::process::exit(1);
        }
    };
    let mut store = DayStore::from_days(days, rules);

    match cli.command {
        Commands::Completions { shell } => cmd_completions(shell),

        Commands::Add { name, duration, start, date, yes } => {
            cmd_add(&mut store, &storage, name, duration, start, date, yes)
        }

        Commands::Edit { id, name, start, duration, date, yes } => {
            cmd_edit(&mut store, &storage, id, name, start, duration, date, yes)
        }

        Commands::Done { id, date } => cmd_done(&mut store, &storage, id, date),

        Commands::Rm { id, date } => cmd_rm(&mut store, &storage, id, date),

        Commands::Reset { date, yes } => cmd_reset(&mut store, &storage, date, yes),

        Commands::List { date } => cmd_list(&store, date),

        Commands::History { limit } => cmd_history(&store, limit),

        Commands::Names => cmd_names(&store),

        Commands::Summary { date } => cmd_summary(&store, date),

        Commands::Chart { width } => cmd_chart(&store, width),

        Commands::Reminders { date } => cmd_reminders(&store, date),

        Commands::Export { output } => cmd_export(&store, output),

        Commands::Import { input, no_backup } => {
            cmd_import(&mut store, &storage, &db_path, input, no_backup)
        }

        Commands::Backup => cmd_backup(&db_path),
    }
}
