//! Live display of the session in progress.

pub mod timer;

use chrono::{DateTime, Utc};

pub const IDLE_DISPLAY: &str = "00:00:00";

/// Formats elapsed seconds as `HH:MM:SS`. Hours wrap at 24 the same way minutes and seconds
/// wrap at 60, so a session running for 25 hours reads `01:00:00`.
pub fn format_elapsed(seconds: i64) -> String {
    let s = seconds.max(0);
    let m = s / 60;
    let h = m / 60;
    format!("{:02}:{:02}:{:02}", h % 24, m % 60, s % 60)
}

/// Display for a session started at `start`, as seen at `now`.
pub fn elapsed_display(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_elapsed((now - start).num_seconds())
}
