//! The in-memory day store.
//!
//! `DayStore` owns every day's ordered task list and is the only place tasks
//! are created, edited or removed. It performs no I/O; whoever owns it loads
//! and saves it through a [`Storage`](crate::db::Storage) implementation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

use crate::chain::{overlapping, suggest_next_start, ChainRules, Validated};
use crate::error::{ScheduleError, StoreError};
use crate::task::{Proposal, Task};
use crate::time::MINUTES_PER_DAY;

/// Date-keyed task lists, the persisted shape of the store.
pub type Days = BTreeMap<NaiveDate, Vec<Task>>;

/// Outcome of an add or edit that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Saved(Task),
    /// The task ran past bedtime and the caller declined it.
    Cancelled,
}

/// Scheduled time totals for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub task_count: usize,
    pub done_count: usize,
    pub scheduled_minutes: u32,
    pub done_minutes: u32,
    pub remaining_minutes: u32,
}

/// One bar of the scheduled-vs-completed chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub scheduled_hours: f64,
    pub completed_hours: f64,
}

#[derive(Debug, Default, Clone)]
pub struct DayStore {
    days: Days,
    rules: ChainRules,
    next_start_hint: Option<(NaiveDate, String)>,
}

impl DayStore {
    pub fn new(rules: ChainRules) -> Self {
        DayStore {
            days: Days::new(),
            rules,
            next_start_hint: None,
        }
    }

    pub fn from_days(days: Days, rules: ChainRules) -> Self {
        DayStore {
            days,
            rules,
            next_start_hint: None,
        }
    }

    pub fn days(&self) -> &Days {
        &self.days
    }

    pub fn rules(&self) -> ChainRules {
        self.rules
    }

    /// The task list for `date`; empty when nothing was ever scheduled.
    pub fn day(&self, date: NaiveDate) -> &[Task] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every date with a (possibly empty) task list, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> u64 {
        self.days
            .values()
            .flat_map(|tasks| tasks.iter().map(|t| t.id))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Where the next task on `date` should start.
    pub fn next_start(&self, date: NaiveDate) -> Option<String> {
        match &self.next_start_hint {
            Some((hint_date, time)) if *hint_date == date => Some(time.clone()),
            _ => suggest_next_start(self.day(date)),
        }
    }

    /// Append a task to `date`.
    ///
    /// `confirm_bedtime` is consulted only when the task ends at or after
    /// bedtime; returning `false` leaves the day untouched.
    pub fn add_task<F>(
        &mut self,
        date: NaiveDate,
        proposal: &Proposal,
        confirm_bedtime: F,
    ) -> Result<Commit, ScheduleError>
    where
        F: FnOnce(&Validated) -> bool,
    {
        let validated = self.rules.validate(self.day(date), proposal, false)?;
        if validated.bedtime && !confirm_bedtime(&validated) {
            debug!("Bedtime confirmation declined for '{}' on {}", validated.name, date);
            return Ok(Commit::Cancelled);
        }

        let task = Task {
            id: self.next_id(),
            name: validated.name,
            duration_minutes: validated.duration_minutes,
            start_time: validated.start_time,
            end_time: validated.end_time,
            done: false,
        };
        self.days.entry(date).or_default().push(task.clone());
        self.next_start_hint = suggest_next_start(self.day(date)).map(|start| (date, start));
        info!(
            "Added task {} '{}' on {} ({}-{})",
            task.id, task.name, date, task.start_time, task.end_time
        );
        Ok(Commit::Saved(task))
    }

    /// Replace name, start and duration of an existing task in place.
    ///
    /// The task keeps its id, position and done flag.
    pub fn update_task<F>(
        &mut self,
        date: NaiveDate,
        id: u64,
        proposal: &Proposal,
        confirm_bedtime: F,
    ) -> Result<Commit, StoreError>
    where
        F: FnOnce(&Validated) -> bool,
    {
        let day = self.day(date);
        if !day.iter().any(|t| t.id == id) {
            return Err(StoreError::TaskNotFound { date, id });
        }
        let validated = self.rules.validate(day, proposal, true)?;
        if validated.bedtime && !confirm_bedtime(&validated) {
            debug!("Bedtime confirmation declined for edit of task {} on {}", id, date);
            return Ok(Commit::Cancelled);
        }
        let overlaps = overlapping(day, validated.start_minutes, validated.end_minutes, id);
        if !overlaps.is_empty() {
            warn!("Edited task {} on {} now overlaps task(s) {:?}", id, date, overlaps);
        }

        self.forget_hint(date);
        let task = self
            .task_mut(date, id)
            .ok_or(StoreError::TaskNotFound { date, id })?;
        task.name = validated.name;
        task.duration_minutes = validated.duration_minutes;
        task.start_time = validated.start_time;
        task.end_time = validated.end_time;
        info!("Updated task {} on {}", id, date);
        Ok(Commit::Saved(task.clone()))
    }

    /// Flip the done flag, returning the new value.
    pub fn toggle_done(&mut self, date: NaiveDate, id: u64) -> Result<bool, StoreError> {
        let task = self
            .task_mut(date, id)
            .ok_or(StoreError::TaskNotFound { date, id })?;
        task.done = !task.done;
        debug!("Task {} on {} done={}", id, date, task.done);
        Ok(task.done)
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn remove_task(&mut self, date: NaiveDate, id: u64) -> bool {
        let Some(tasks) = self.days.get_mut(&date) else {
            return false;
        };
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() != before;
        if removed {
            self.forget_hint(date);
            info!("Removed task {} from {}", id, date);
        }
        removed
    }

    /// Clear every task on `date`, keeping the day itself.
    pub fn reset_day(&mut self, date: NaiveDate) -> usize {
        let tasks = self.days.entry(date).or_default();
        let cleared = tasks.len();
        tasks.clear();
        self.forget_hint(date);
        info!("Reset {} ({} task(s) cleared)", date, cleared);
        cleared
    }

    /// Append a task restored from history, e.g. a CSV import.
    ///
    /// Ordering against the rest of the day is not enforced and no bedtime
    /// confirmation is asked for; overflow past midnight is still rejected.
    pub fn restore_task(
        &mut self,
        date: NaiveDate,
        proposal: &Proposal,
        done: bool,
    ) -> Result<Task, ScheduleError> {
        let validated = self.rules.validate(self.day(date), proposal, true)?;
        let task = Task {
            id: self.next_id(),
            name: validated.name,
            duration_minutes: validated.duration_minutes,
            start_time: validated.start_time,
            end_time: validated.end_time,
            done,
        };
        self.days.entry(date).or_default().push(task.clone());
        Ok(task)
    }

    /// Distinct task names across all days, sorted.
    pub fn unique_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .days
            .values()
            .flatten()
            .map(|t| t.name.as_str())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn build_summary(&self, date: NaiveDate) -> DaySummary {
        let tasks = self.day(date);
        let scheduled: u32 = tasks.iter().map(|t| t.duration_minutes).sum();
        let done: u32 = tasks.iter().filter(|t| t.done).map(|t| t.duration_minutes).sum();
        DaySummary {
            date,
            task_count: tasks.len(),
            done_count: tasks.iter().filter(|t| t.done).count(),
            scheduled_minutes: scheduled,
            done_minutes: done,
            remaining_minutes: MINUTES_PER_DAY.saturating_sub(scheduled),
        }
    }

    /// Scheduled and completed hours for every stored day, oldest first.
    pub fn build_chart_series(&self) -> Vec<ChartPoint> {
        self.days
            .iter()
            .map(|(date, tasks)| {
                let scheduled: u32 = tasks.iter().map(|t| t.duration_minutes).sum();
                let completed: u32 =
                    tasks.iter().filter(|t| t.done).map(|t| t.duration_minutes).sum();
                ChartPoint {
                    date: *date,
                    scheduled_hours: round2(scheduled as f64 / 60.0),
                    completed_hours: round2(completed as f64 / 60.0),
                }
            })
            .collect()
    }

    fn forget_hint(&mut self, date: NaiveDate) {
        if matches!(&self.next_start_hint, Some((d, _)) if *d == date) {
            self.next_start_hint = None;
        }
    }

    fn task_mut(&mut self, date: NaiveDate, id: u64) -> Option<&mut Task> {
        self.days.get_mut(&date)?.iter_mut().find(|t| t.id == id)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
