use serde::Serialize;

/// Calendar classification of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayStatus {
    Empty,
    Partial,
    Complete,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Empty => "empty",
            DayStatus::Partial => "partial",
            DayStatus::Complete => "complete",
        }
    }

    /// One-char marker used in the calendar grid.
    pub fn marker(&self) -> char {
        match self {
            DayStatus::Empty => '·',
            DayStatus::Partial => '◐',
            DayStatus::Complete => '●',
        }
    }
}
