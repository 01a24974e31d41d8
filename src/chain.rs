//! Validation of proposed tasks against the rest of their day.
//!
//! A day is a chain: each newly appended task must start no earlier than the
//! previous one ends, and nothing may run past midnight. Tasks that finish
//! late in the evening are accepted but flagged so the caller can ask for
//! confirmation first.

use crate::error::ScheduleError;
use crate::task::{Proposal, Task};
use crate::time::{minutes_to_time, time_to_minutes, MINUTES_PER_DAY};

/// Default bedtime threshold, 22:00.
pub const DEFAULT_BEDTIME_MINUTES: u32 = 22 * 60;

/// Tunable limits applied by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainRules {
    /// Tasks ending at or after this many minutes past midnight are flagged.
    pub bedtime_minutes: u32,
}

impl Default for ChainRules {
    fn default() -> Self {
        ChainRules {
            bedtime_minutes: DEFAULT_BEDTIME_MINUTES,
        }
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub name: String,
    pub start_time: String,
    pub start_minutes: u32,
    pub duration_minutes: u32,
    pub end_time: String,
    pub end_minutes: u32,
    /// The task ends at or after bedtime and needs confirmation.
    pub bedtime: bool,
}

impl ChainRules {
    /// Validate `proposal` against `day_tasks` and compute its end time.
    ///
    /// Edits skip the ordering check; only appends must follow the last task.
    pub fn validate(
        &self,
        day_tasks: &[Task],
        proposal: &Proposal,
        is_edit: bool,
    ) -> Result<Validated, ScheduleError> {
        let name = proposal.name.trim();
        if name.is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        let start_raw = proposal.start_time.trim();
        if start_raw.is_empty() {
            return Err(ScheduleError::MissingStartTime);
        }
        let start = time_to_minutes(start_raw)
            .ok_or_else(|| ScheduleError::InvalidStartTime(start_raw.to_string()))?;
        if proposal.duration_minutes <= 0 {
            return Err(ScheduleError::NonPositiveDuration);
        }

        // Anything beyond u32 is past midnight anyway.
        let duration = u32::try_from(proposal.duration_minutes).unwrap_or(u32::MAX);
        let end = start.saturating_add(duration);
        if end > MINUTES_PER_DAY {
            return Err(ScheduleError::OverflowPastMidnight { end_minutes: end });
        }

        if !is_edit {
            if let Some(previous_end) = day_tasks.last().and_then(Task::end_minutes) {
                if start < previous_end {
                    return Err(ScheduleError::OutOfOrderStart {
                        start: minutes_to_time(i64::from(start)),
                        previous_end: end_label(previous_end),
                    });
                }
            }
        }

        Ok(Validated {
            name: name.to_string(),
            start_time: minutes_to_time(i64::from(start)),
            start_minutes: start,
            duration_minutes: duration,
            end_time: minutes_to_time(i64::from(end)),
            end_minutes: end,
            bedtime: end >= self.bedtime_minutes,
        })
    }
}

/// End of a task for messages; midnight reads as `24:00`.
fn end_label(minutes: u32) -> String {
    if minutes >= MINUTES_PER_DAY {
        "24:00".to_string()
    } else {
        minutes_to_time(i64::from(minutes))
    }
}

/// Validate with the default rules.
pub fn validate_and_compute_end(
    day_tasks: &[Task],
    proposal: &Proposal,
    is_edit: bool,
) -> Result<Validated, ScheduleError> {
    ChainRules::default().validate(day_tasks, proposal, is_edit)
}

/// The start time a new task on this day should chain from.
///
/// `None` when the day is empty or its last task runs to midnight.
pub fn suggest_next_start(day_tasks: &[Task]) -> Option<String> {
    day_tasks
        .last()
        .and_then(Task::end_minutes)
        .filter(|end| *end < MINUTES_PER_DAY)
        .map(|end| minutes_to_time(i64::from(end)))
}

/// Ids of tasks whose time range intersects `[start, end)`, ignoring `skip_id`.
pub fn overlapping(day_tasks: &[Task], start: u32, end: u32, skip_id: u64) -> Vec<u64> {
    day_tasks
        .iter()
        .filter(|t| t.id != skip_id)
        .filter(|t| match (t.start_minutes(), t.end_minutes()) {
            (Some(s), Some(e)) => s < end && start < e,
            _ => false,
        })
        .map(|t| t.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, start: &str, end: &str) -> Task {
        let duration = time_to_minutes(end).unwrap() - time_to_minutes(start).unwrap();
        Task {
            id,
            name: format!("t{}", id),
            duration_minutes: duration,
            start_time: start.into(),
            end_time: end.into(),
            done: false,
        }
    }

    fn propose(name: &str, start: &str, duration: i64) -> Proposal {
        Proposal::new(name, start, duration)
    }

    #[test]
    fn test_computes_end_time() {
        let v = validate_and_compute_end(&[], &propose("Read", "09:00", 30), false).unwrap();
        assert_eq!(v.end_time, "09:30");
        assert_eq!(v.end_minutes, 570);
        assert!(!v.bedtime);
    }

    #[test]
    fn test_end_matches_start_plus_duration() {
        for start in (0..1440).step_by(37) {
            for duration in [1i64, 15, 59, 120, 400] {
                let proposal = Proposal::new("x", minutes_to_time(start), duration);
                let result = validate_and_compute_end(&[], &proposal, false);
                let end = start + duration;
                if end > 1440 {
                    assert!(matches!(result, Err(ScheduleError::OverflowPastMidnight { .. })));
                } else if end < 1440 {
                    let v = result.unwrap();
                    assert_eq!(time_to_minutes(&v.end_time), Some(end as u32));
                }
            }
        }
    }

    #[test]
    fn test_overflow_past_midnight() {
        let err = validate_and_compute_end(&[], &propose("Late", "23:50", 20), false).unwrap_err();
        assert_eq!(err, ScheduleError::OverflowPastMidnight { end_minutes: 1450 });
    }

    #[test]
    fn test_huge_duration_is_overflow() {
        for duration in [i64::MAX, i64::from(u32::MAX), i64::from(u32::MAX) + 1, 1441] {
            let err = validate_and_compute_end(&[], &propose("x", "09:00", duration), false)
                .unwrap_err();
            assert!(
                matches!(err, ScheduleError::OverflowPastMidnight { .. }),
                "duration {} gave {:?}",
                duration,
                err
            );
        }
    }

    #[test]
    fn test_exactly_midnight_is_accepted() {
        let v = validate_and_compute_end(&[], &propose("Late", "23:00", 60), false).unwrap();
        assert_eq!(v.end_minutes, 1440);
        assert_eq!(v.end_time, "23:59");
        assert!(v.bedtime);
    }

    #[test]
    fn test_field_checks() {
        let check = |p: Proposal| validate_and_compute_end(&[], &p, false).unwrap_err();
        assert_eq!(check(propose("  ", "09:00", 10)), ScheduleError::EmptyName);
        assert_eq!(check(propose("a", "", 10)), ScheduleError::MissingStartTime);
        assert_eq!(
            check(propose("a", "nine", 10)),
            ScheduleError::InvalidStartTime("nine".into())
        );
        assert_eq!(check(propose("a", "09:00", 0)), ScheduleError::NonPositiveDuration);
        assert_eq!(check(propose("a", "09:00", -5)), ScheduleError::NonPositiveDuration);
    }

    #[test]
    fn test_append_order() {
        let day = vec![task(1, "09:00", "09:30")];
        let err = validate_and_compute_end(&day, &propose("Nap", "09:00", 10), false).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OutOfOrderStart {
                start: "09:00".into(),
                previous_end: "09:30".into()
            }
        );
        assert!(validate_and_compute_end(&day, &propose("Walk", "09:30", 15), false).is_ok());
    }

    #[test]
    fn test_append_after_task_running_to_midnight() {
        let late = Task {
            id: 1,
            name: "Late".into(),
            duration_minutes: 60,
            start_time: "23:00".into(),
            end_time: "23:59".into(),
            done: false,
        };
        let day = vec![late];
        let err = validate_and_compute_end(&day, &propose("Extra", "23:59", 1), false).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OutOfOrderStart {
                start: "23:59".into(),
                previous_end: "24:00".into()
            }
        );
        assert_eq!(suggest_next_start(&day), None);
    }

    #[test]
    fn test_previous_end_derived_from_duration() {
        let mut stale = task(1, "09:00", "09:30");
        stale.end_time = "garbage".into();
        let day = vec![stale];
        assert!(validate_and_compute_end(&day, &propose("Nap", "09:10", 10), false).is_err());
        assert_eq!(suggest_next_start(&day).as_deref(), Some("09:30"));
    }

    #[test]
    fn test_edits_skip_ordering() {
        let day = vec![task(1, "09:00", "09:30"), task(2, "09:30", "10:00")];
        assert!(validate_and_compute_end(&day, &propose("Moved", "08:00", 15), true).is_ok());
    }

    #[test]
    fn test_bedtime_flag() {
        let rules = ChainRules::default();
        assert!(!rules.validate(&[], &propose("a", "21:00", 59), false).unwrap().bedtime);
        assert!(rules.validate(&[], &propose("a", "21:00", 60), false).unwrap().bedtime);
        let early = ChainRules { bedtime_minutes: 20 * 60 };
        assert!(early.validate(&[], &propose("a", "19:30", 30), false).unwrap().bedtime);
    }

    #[test]
    fn test_suggest_and_overlap() {
        let day = vec![task(1, "09:00", "09:30"), task(2, "10:00", "11:00")];
        assert_eq!(suggest_next_start(&day).as_deref(), Some("11:00"));
        assert_eq!(suggest_next_start(&[]), None);
        assert_eq!(overlapping(&day, 9 * 60 + 15, 10 * 60 + 5, 0), vec![1, 2]);
        assert_eq!(overlapping(&day, 9 * 60 + 30, 10 * 60, 0), Vec::<u64>::new());
        assert_eq!(overlapping(&day, 9 * 60, 9 * 60 + 30, 1), Vec::<u64>::new());
    }
}
