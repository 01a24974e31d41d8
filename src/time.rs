//! Clock-time arithmetic.
//!
//! Times of day travel through the planner as `HH:MM` strings and are
//! converted to minute offsets from midnight for any comparison or sum.

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Shown in place of a time that is missing or could not be computed.
pub const TIME_PLACEHOLDER: &str = "--:--";

/// Parse an `HH:MM` string into minutes after midnight.
///
/// Returns `None` for empty or malformed input. Parsing is lenient about
/// missing segments: `"9"` is 09:00 and `":30"` is 00:30.
pub fn time_to_minutes(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let mut parts = s.splitn(2, ':');
    let hours = parse_segment(parts.next().unwrap_or(""))?;
    let minutes = parse_segment(parts.next().unwrap_or(""))?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn parse_segment(seg: &str) -> Option<u32> {
    let seg = seg.trim();
    if seg.is_empty() {
        return Some(0);
    }
    if !seg.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    seg.parse().ok()
}

/// Format minutes after midnight as `HH:MM`.
///
/// Input is clamped to `[0, 1440]`, and the end of the day renders as
/// `23:59` rather than `24:00`.
pub fn minutes_to_time(minutes: i64) -> String {
    let m = minutes.clamp(0, MINUTES_PER_DAY as i64);
    let m = m.min(MINUTES_PER_DAY as i64 - 1);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Like [`minutes_to_time`] but renders [`TIME_PLACEHOLDER`] for `None`.
pub fn display_time(minutes: Option<i64>) -> String {
    match minutes {
        Some(m) => minutes_to_time(m),
        None => TIME_PLACEHOLDER.to_string(),
    }
}

/// Human readable duration: `"1h 30m"`, `"1h"`, `"45m"`, `"0m"`.
pub fn minutes_to_readable(minutes: u32) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    let mut parts = Vec::new();
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 {
        parts.push(format!("{}m", m));
    }
    if parts.is_empty() {
        "0m".into()
    } else {
        parts.join(" ")
    }
}
