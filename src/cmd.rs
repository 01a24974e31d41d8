//! Command implementations for the CLI interface.
//!
//! Each handler applies one operation to the loaded `DayStore`, saves it
//! through the injected `Storage` when something changed, and prints the
//! result. Failures are reported on stderr and exit with status 1.

use std::io::{self, Write};
use std::path::Path;

use chrono::{Duration, Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use day_planner::chain::Validated;
use day_planner::db::{create_backup, Storage};
use day_planner::notify::{rebuild_reminders, ReminderKind, ReminderQueue};
use day_planner::store::{Commit, DayStore};
use day_planner::task::{Proposal, Task};
use day_planner::time::minutes_to_readable;
use day_planner::transfer::{export_to_file, import_from_file};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to a day. Without --start it begins where the last task ends.
    Add {
        /// Task name.
        name: String,
        /// Duration in minutes.
        #[arg(long, short)]
        duration: i64,
        /// Start time (HH:MM).
        #[arg(long, short)]
        start: Option<String>,
        /// Day: YYYY-MM-DD, "today", "yesterday" or "tomorrow".
        #[arg(long)]
        date: Option<String>,
        /// Accept a bedtime warning without prompting.
        #[arg(long, short)]
        yes: bool,
    },

    /// Edit the name, start or duration of a task.
    Edit {
        /// Task ID.
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short)]
        start: Option<String>,
        #[arg(long, short)]
        duration: Option<i64>,
        #[arg(long)]
        date: Option<String>,
        /// Accept a bedtime warning without prompting.
        #[arg(long, short)]
        yes: bool,
    },

    /// Toggle a task between done and not done.
    Done {
        /// Task ID.
        id: u64,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a task.
    Rm {
        /// Task ID.
        id: u64,
        #[arg(long)]
        date: Option<String>,
    },

    /// Remove every task from a day.
    Reset {
        #[arg(long)]
        date: Option<String>,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show the tasks of a day.
    List {
        #[arg(long)]
        date: Option<String>,
    },

    /// List past days with their totals.
    History {
        /// Only show the most recent N days.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every task name used so far.
    Names,

    /// Scheduled and remaining time for a day.
    Summary {
        #[arg(long)]
        date: Option<String>,
    },

    /// Scheduled vs completed hours per day.
    Chart {
        /// Width of the longest bar in characters.
        #[arg(long, default_value_t = 40)]
        width: usize,
    },

    /// Show the reminders still ahead for a day.
    Reminders {
        #[arg(long)]
        date: Option<String>,
    },

    /// Export all days to CSV.
    Export {
        /// Output file path (default: days.csv)
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Import tasks from CSV.
    Import {
        /// Input CSV file path
        input: String,
        /// Skip creating backup before import
        #[arg(long)]
        no_backup: bool,
    },

    /// Create a timestamped backup of the planner file.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse a day argument, defaulting to today.
///
/// Supports "today", "yesterday", "tomorrow" and `YYYY-MM-DD`.
pub fn parse_date_input(s: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    let Some(s) = s else {
        return Some(today);
    };
    match s.trim().to_lowercase().as_str() {
        "" | "today" => Some(today),
        "yesterday" => Some(today - Duration::days(1)),
        "tomorrow" => Some(today + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").ok(),
    }
}

fn resolve_date(s: Option<String>) -> NaiveDate {
    match parse_date_input(s.as_deref(), Local::now().date_naive()) {
        Some(d) => d,
        None => {
            eprintln!("Invalid date '{}', expected YYYY-MM-DD", s.unwrap_or_default());
            std::process::exit(1);
        }
    }
}

fn save_or_exit(store: &DayStore, storage: &dyn Storage) {
    if let Err(e) = storage.save(store.days()) {
        eprintln!("Failed to save planner: {e}");
        std::process::exit(1);
    }
}

fn prompt_yes_no(question: &str) -> bool {
    print!("{} (y/N): ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut response = String::new();
    io::stdin().read_line(&mut response).is_ok() && response.trim().to_lowercase().starts_with('y')
}

fn confirm_bedtime(yes: bool) -> impl FnOnce(&Validated) -> bool {
    move |v: &Validated| {
        yes || prompt_yes_no(&format!(
            "'{}' ends at {}, past bedtime. Keep it?",
            v.name, v.end_time
        ))
    }
}

/// Add a new task to a day.
pub fn cmd_add(
    store: &mut DayStore,
    storage: &dyn Storage,
    name: String,
    duration: i64,
    start: Option<String>,
    date: Option<String>,
    yes: bool,
) {
    let date = resolve_date(date);
    let start = start.or_else(|| store.next_start(date)).unwrap_or_default();
    let proposal = Proposal::new(name, start, duration);

    match store.add_task(date, &proposal, confirm_bedtime(yes)) {
        Ok(Commit::Saved(task)) => {
            save_or_exit(store, storage);
            println!(
                "Added task {} on {}: {} {}-{} ({})",
                task.id,
                date,
                task.name,
                task.start_time,
                task.end_time,
                minutes_to_readable(task.duration_minutes)
            );
            println!("Next task starts at {}", task.end_time);
        }
        Ok(Commit::Cancelled) => println!("Cancelled, nothing added."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Edit an existing task. Omitted fields keep their current value.
pub fn cmd_edit(
    store: &mut DayStore,
    storage: &dyn Storage,
    id: u64,
    name: Option<String>,
    start: Option<String>,
    duration: Option<i64>,
    date: Option<String>,
    yes: bool,
) {
    let date = resolve_date(date);
    let Some(current) = store.day(date).iter().find(|t| t.id == id).cloned() else {
        eprintln!("No task {} on {}", id, date);
        std::process::exit(1);
    };
    let proposal = Proposal::new(
        name.unwrap_or(current.name),
        start.unwrap_or(current.start_time),
        duration.unwrap_or(current.duration_minutes as i64),
    );

    match store.update_task(date, id, &proposal, confirm_bedtime(yes)) {
        Ok(Commit::Saved(task)) => {
            save_or_exit(store, storage);
            println!(
                "Updated task {}: {} {}-{}",
                task.id, task.name, task.start_time, task.end_time
            );
        }
        Ok(Commit::Cancelled) => println!("Cancelled, task {} unchanged.", id),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Toggle the done flag of a task.
pub fn cmd_done(store: &mut DayStore, storage: &dyn Storage, id: u64, date: Option<String>) {
    let date = resolve_date(date);
    match store.toggle_done(date, id) {
        Ok(done) => {
            save_or_exit(store, storage);
            println!("Task {} marked {}.", id, if done { "done" } else { "not done" });
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Delete a task; deleting a missing task is not an error.
pub fn cmd_rm(store: &mut DayStore, storage: &dyn Storage, id: u64, date: Option<String>) {
    let date = resolve_date(date);
    if store.remove_task(date, id) {
        save_or_exit(store, storage);
        println!("Deleted task {}.", id);
    } else {
        println!("No task {} on {}, nothing deleted.", id, date);
    }
}

/// Clear a day after confirmation.
pub fn cmd_reset(store: &mut DayStore, storage: &dyn Storage, date: Option<String>, yes: bool) {
    let date = resolve_date(date);
    let count = store.day(date).len();
    if !yes && !prompt_yes_no(&format!("Remove all {} task(s) on {}?", count, date)) {
        println!("Reset cancelled.");
        return;
    }
    store.reset_day(date);
    save_or_exit(store, storage);
    println!("Cleared {} task(s) from {}.", count, date);
}

/// Print one day's tasks in a table.
pub fn cmd_list(store: &DayStore, date: Option<String>) {
    let date = resolve_date(date);
    let tasks = store.day(date);
    println!("{}", date.format("%A %Y-%m-%d"));
    if tasks.is_empty() {
        println!("No tasks scheduled.");
        return;
    }
    print_table(tasks);
    let summary = store.build_summary(date);
    println!(
        "\n{} scheduled, {} done, {} free",
        minutes_to_readable(summary.scheduled_minutes),
        minutes_to_readable(summary.done_minutes),
        minutes_to_readable(summary.remaining_minutes)
    );
}

/// Print per-day totals, newest first.
pub fn cmd_history(store: &DayStore, limit: Option<usize>) {
    let mut dates: Vec<NaiveDate> = store.dates().collect();
    dates.reverse();
    if let Some(n) = limit {
        dates.truncate(n);
    }
    if dates.is_empty() {
        println!("No days recorded yet.");
        return;
    }
    println!("{:<12} {:<6} {:<6} {:<10} {}", "Date", "Tasks", "Done", "Scheduled", "Completed");
    for date in dates {
        let s = store.build_summary(date);
        println!(
            "{:<12} {:<6} {:<6} {:<10} {}",
            date,
            s.task_count,
            s.done_count,
            minutes_to_readable(s.scheduled_minutes),
            minutes_to_readable(s.done_minutes)
        );
    }
}

/// Print distinct task names, one per line.
pub fn cmd_names(store: &DayStore) {
    for name in store.unique_names() {
        println!("{}", name);
    }
}

pub fn cmd_summary(store: &DayStore, date: Option<String>) {
    let date = resolve_date(date);
    let s = store.build_summary(date);
    println!("Date:       {}", s.date);
    println!("Tasks:      {} ({} done)", s.task_count, s.done_count);
    println!("Scheduled:  {}", minutes_to_readable(s.scheduled_minutes));
    println!("Completed:  {}", minutes_to_readable(s.done_minutes));
    println!("Remaining:  {}", minutes_to_readable(s.remaining_minutes));
}

/// Print a horizontal bar chart of scheduled vs completed hours.
pub fn cmd_chart(store: &DayStore, width: usize) {
    let series = store.build_chart_series();
    if series.is_empty() {
        println!("No days recorded yet.");
        return;
    }
    let max = series
        .iter()
        .map(|p| p.scheduled_hours)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    for point in series {
        let scheduled = bar_len(point.scheduled_hours, max, width);
        let completed = bar_len(point.completed_hours, max, width).min(scheduled);
        println!(
            "{} {}{}{} {:>5.2}h / {:.2}h",
            point.date,
            "█".repeat(completed),
            "░".repeat(scheduled - completed),
            " ".repeat(width - scheduled),
            point.completed_hours,
            point.scheduled_hours
        );
    }
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    (((value / max) * width as f64).round() as usize).min(width)
}

/// Print the reminders that are still ahead for a day.
pub fn cmd_reminders(store: &DayStore, date: Option<String>) {
    let date = resolve_date(date);
    let mut queue = ReminderQueue::default();
    let count = rebuild_reminders(&mut queue, date, store.day(date), Local::now().naive_local());
    if count == 0 {
        println!("No upcoming reminders for {}.", date);
        return;
    }
    for r in &queue.pending {
        let kind = match r.kind {
            ReminderKind::Start => "start",
            ReminderKind::End => "end",
        };
        println!("{} {:<5} {}", r.at.format("%Y-%m-%d %H:%M"), kind, r.message);
    }
}

pub fn cmd_export(store: &DayStore, output: Option<String>) {
    let output_path = output.unwrap_or_else(|| "days.csv".to_string());
    match export_to_file(store, Path::new(&output_path)) {
        Ok(count) => println!("Exported {} task(s) to {}", count, output_path),
        Err(e) => {
            eprintln!("Failed to write CSV file: {}", e);
            std::process::exit(1);
        }
    }
}

/// Import tasks from CSV with an automatic backup of the planner file.
pub fn cmd_import(
    store: &mut DayStore,
    storage: &dyn Storage,
    db_path: &Path,
    input: String,
    no_backup: bool,
) {
    if !no_backup && db_path.exists() {
        match create_backup(db_path) {
            Ok(backup_path) => println!("Created backup: {}", backup_path.display()),
            Err(e) => {
                eprintln!("Warning: Failed to create backup: {}", e);
                if !prompt_yes_no("Continue without backup?") {
                    println!("Import cancelled.");
                    return;
                }
            }
        }
    }

    match import_from_file(store, Path::new(&input)) {
        Ok(report) => {
            save_or_exit(store, storage);
            println!(
                "Import completed. {} task(s) imported, {} skipped.",
                report.imported, report.skipped
            );
        }
        Err(e) => {
            eprintln!("Failed to import '{}': {}", input, e);
            std::process::exit(1);
        }
    }
}

pub fn cmd_backup(db_path: &Path) {
    match create_backup(db_path) {
        Ok(backup_path) => println!("Backup created: {}", backup_path.display()),
        Err(e) => {
            eprintln!("Failed to create backup: {}", e);
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[Task]) {
    println!("{:<5} {:<5} {:<5} {:<8} {:<4} {}", "ID", "Start", "End", "Length", "Done", "Name");
    for t in tasks {
        println!(
            "{:<5} {:<5} {:<5} {:<8} {:<4} {}",
            t.id,
            t.start_time,
            t.end_time,
            minutes_to_readable(t.duration_minutes),
            if t.done { "x" } else { "-" },
            truncate(&t.name, 48)
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_input() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_date_input(None, today), Some(today));
        assert_eq!(parse_date_input(Some("Today"), today), Some(today));
        assert_eq!(
            parse_date_input(Some("yesterday"), today),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert_eq!(parse_date_input(Some("tomorrow"), today), NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(
            parse_date_input(Some("2024-12-31"), today),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(parse_date_input(Some("31/12/2024"), today), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer name", 6), "a lon…");
    }

    #[test]
    fn test_bar_len() {
        assert_eq!(bar_len(2.0, 4.0, 40), 20);
        assert_eq!(bar_len(5.0, 4.0, 40), 40);
        assert_eq!(bar_len(0.0, 4.0, 40), 0);
    }
}
