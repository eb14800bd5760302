use super::allocation::AllocationEntry;
use super::daily_target::DailyTarget;
use chrono::NaiveDate;
use serde::Serialize;

/// The persisted view of a day: its target plus the committed entries.
#[derive(Debug, Clone, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub daily_target: DailyTarget,
    pub entries: Vec<AllocationEntry>,
}

impl DayRecord {
    pub fn new(daily_target: DailyTarget, entries: Vec<AllocationEntry>) -> Self {
        Self {
            date: daily_target.date,
            daily_target,
            entries,
        }
    }

    pub fn allocated_minutes(&self) -> u64 {
        self.entries.iter().map(|e| e.minutes() as u64).sum()
    }

    /// Minutes of the target not yet attributed (negative when over).
    pub fn remaining_minutes(&self) -> i64 {
        self.daily_target.total_minutes as i64 - self.allocated_minutes() as i64
    }
}
