use chrono::NaiveDate;
use serde::Serialize;

use crate::core::converter::{self, HoursMinutes};

/// The declared total work duration of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTarget {
    pub date: NaiveDate,      // ⇔ daily_targets.date (TEXT "YYYY-MM-DD")
    pub total_minutes: u32,   // ⇔ daily_targets.total_minutes
}

impl DailyTarget {
    pub fn new(date: NaiveDate, total_minutes: u32) -> Self {
        Self {
            date,
            total_minutes,
        }
    }

    pub fn duration(&self) -> HoursMinutes {
        converter::split_minutes(self.total_minutes)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
