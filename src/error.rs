//! Error types shared across the planner.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised while validating an add or edit.
///
/// All of these are recoverable: the user fixes the input and resubmits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Task name cannot be empty")]
    EmptyName,
    #[error("A start time is required")]
    MissingStartTime,
    #[error("Invalid start time '{0}', expected HH:MM")]
    InvalidStartTime(String),
    #[error("Duration must be a positive number of minutes")]
    NonPositiveDuration,
    #[error("Task would end at {end_minutes} minutes, past midnight. Shorten it or start earlier")]
    OverflowPastMidnight { end_minutes: u32 },
    #[error("Task starts at {start} but the previous task ends at {previous_end}")]
    OutOfOrderStart { start: String, previous_end: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No task {id} on {date}")]
    TaskNotFound { date: NaiveDate, id: u64 },
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize planner data: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to access CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV file is empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot determine config directory")]
    NoConfigDir,
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid bedtime '{0}', expected HH:MM")]
    InvalidBedtime(String),
}
