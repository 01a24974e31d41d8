//! Start and end reminders for a day's tasks.
//!
//! The planner only decides *what* to announce and *when*. Delivery is left to
//! a [`ReminderScheduler`], which is rebuilt from scratch whenever the day's
//! tasks or the active date change so that no reminder outlives its data.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Start,
    End,
}

/// "Notify at `at` with `message`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub task_id: u64,
    pub kind: ReminderKind,
    pub at: NaiveDateTime,
    pub message: String,
}

/// Something that can deliver reminders later.
pub trait ReminderScheduler {
    /// Drop every pending reminder.
    fn clear(&mut self);
    fn schedule(&mut self, reminder: Reminder);
}

/// Reminders for the not-done tasks of `date` that are still ahead of `now`.
pub fn plan_reminders(date: NaiveDate, tasks: &[Task], now: NaiveDateTime) -> Vec<Reminder> {
    let mut out = Vec::new();
    for task in tasks.iter().filter(|t| !t.done) {
        let slots = [
            (ReminderKind::Start, &task.start_time, format!("Starting: {}", task.name)),
            (ReminderKind::End, &task.end_time, format!("Finished: {}", task.name)),
        ];
        for (kind, time, message) in slots {
            let Ok(time) = NaiveTime::parse_from_str(time, "%H:%M") else {
                continue;
            };
            let at = date.and_time(time);
            if at > now {
                out.push(Reminder {
                    task_id: task.id,
                    kind,
                    at,
                    message,
                });
            }
        }
    }
    out.sort_by_key(|r| r.at);
    out
}

/// Clear `scheduler` and register the current plan for `date`.
pub fn rebuild_reminders<S: ReminderScheduler + ?Sized>(
    scheduler: &mut S,
    date: NaiveDate,
    tasks: &[Task],
    now: NaiveDateTime,
) -> usize {
    scheduler.clear();
    let plan = plan_reminders(date, tasks, now);
    let count = plan.len();
    for reminder in plan {
        scheduler.schedule(reminder);
    }
    debug!("Scheduled {} reminder(s) for {}", count, date);
    count
}

/// Collects reminders in memory, in schedule order.
#[derive(Debug, Default)]
pub struct ReminderQueue {
    pub pending: Vec<Reminder>,
}

impl ReminderScheduler for ReminderQueue {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn schedule(&mut self, reminder: Reminder) {
        self.pending.push(reminder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, name: &str, start: &str, end: &str, done: bool) -> Task {
        Task {
            id,
            name: name.into(),
            duration_minutes: 30,
            start_time: start.into(),
            end_time: end.into(),
            done,
        }
    }

    fn at(date: NaiveDate, hm: &str) -> NaiveDateTime {
        date.and_time(NaiveTime::parse_from_str(hm, "%H:%M").unwrap())
    }

    #[test]
    fn test_plan_skips_past_and_done() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let tasks = vec![
            task(1, "Read", "09:00", "09:30", false),
            task(2, "Walk", "10:00", "10:30", true),
            task(3, "Cook", "11:00", "11:30", false),
        ];
        let plan = plan_reminders(day, &tasks, at(day, "09:10"));
        let summary: Vec<(u64, ReminderKind)> = plan.iter().map(|r| (r.task_id, r.kind)).collect();
        assert_eq!(
            summary,
            vec![(1, ReminderKind::End), (3, ReminderKind::Start), (3, ReminderKind::End)]
        );
        assert_eq!(plan[1].message, "Starting: Cook");
        assert_eq!(plan[0].at, at(day, "09:30"));
    }

    #[test]
    fn test_rebuild_replaces_previous_plan() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut queue = ReminderQueue::default();
        let morning = at(day, "06:00");

        let first = vec![task(1, "Read", "09:00", "09:30", false)];
        assert_eq!(rebuild_reminders(&mut queue, day, &first, morning), 2);

        let second = vec![task(2, "Walk", "10:00", "10:30", false)];
        rebuild_reminders(&mut queue, day, &second, morning);
        assert!(queue.pending.iter().all(|r| r.task_id == 2));
        assert_eq!(queue.pending.len(), 2);

        rebuild_reminders(&mut queue, day, &[], morning);
        assert!(queue.pending.is_empty());
    }

    #[test]
    fn test_other_day_is_all_past() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let next_day = at(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), "00:00");
        let tasks = vec![task(1, "Read", "09:00", "09:30", false)];
        assert!(plan_reminders(day, &tasks, next_day).is_empty());
    }
}
