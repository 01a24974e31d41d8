//! Task data structures.
//!
//! This module defines the scheduled `Task` stored under each day, and the
//! `Proposal` that add and edit requests carry before validation.

use serde::{Deserialize, Serialize};

use crate::time::time_to_minutes;

/// A scheduled block of time on a single day.
///
/// `end_time` is always derived from `start_time + duration_minutes`; it is
/// stored so the persisted record is readable without recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub duration_minutes: u32,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn start_minutes(&self) -> Option<u32> {
        time_to_minutes(&self.start_time)
    }

    /// Derived from start and duration, so a task running to midnight
    /// ends at 1440 even though `end_time` reads `23:59`.
    pub fn end_minutes(&self) -> Option<u32> {
        self.start_minutes().map(|start| start.saturating_add(self.duration_minutes))
    }
}

/// An unvalidated add or edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub name: String,
    pub start_time: String,
    pub duration_minutes: i64,
}

impl Proposal {
    pub fn new(
        name: impl Into<String>,
        start_time: impl Into<String>,
        duration_minutes: i64,
    ) -> Self {
        Proposal {
            name: name.into(),
            start_time: start_time.into(),
            duration_minutes,
        }
    }
}
