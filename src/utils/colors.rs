//! ANSI color helper utilities for terminal output.
use crate::models::day_status::DayStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

pub fn color_for_status(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Empty => GREY,
        DayStatus::Partial => YELLOW,
        DayStatus::Complete => GREEN,
    }
}

/// Remaining minutes of a day:
/// \>0 → yellow (still to allocate)
/// \<0 → red
/// 0 → green
pub fn color_for_remaining(value: i64) -> &'static str {
    if value > 0 {
        YELLOW
    } else if value < 0 {
        RED
    } else {
        GREEN
    }
}

/// Grey out placeholders such as `--` or `00h 00m`.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" || v == "00h 00m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
