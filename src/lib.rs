//! # Day Planner
//!
//! Per-day scheduling of named tasks. Each calendar day holds an ordered
//! list of tasks with a start time and a duration; new tasks chain from the
//! end of the previous one, nothing may run past midnight, and anything
//! ending after bedtime needs an explicit confirmation.
//!
//! ## Layout
//!
//! - [`time`]: `HH:MM` ⇄ minutes conversion and duration formatting
//! - [`chain`]: validation of a proposed task against the rest of its day
//! - [`store`]: the date-keyed task store, summaries and chart series
//! - [`db`]: the `Storage` capability and its JSON file implementation
//! - [`transfer`]: CSV export and import
//! - [`notify`]: start/end reminders handed to an injected scheduler
//! - [`config`]: the optional TOML configuration file
//!
//! The store itself never performs I/O. The `dp` binary loads it from a
//! [`db::Storage`], applies one command, and saves it back.

pub mod chain;
pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod store;
pub mod task;
pub mod time;
pub mod transfer;
