//! Duration converter: hours ↔ minutes ↔ percentage of the daily target.
//!
//! Percentages are rounded to two decimals, so converting a percentage back
//! to minutes may drift by one minute.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// A duration split into whole hours and remaining minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct HoursMinutes {
    pub hours: u32,
    pub minutes: u32,
}

impl HoursMinutes {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// `hours * 60 + minutes`; a value past `u32::MAX` is a validation error.
    pub fn total_minutes(&self) -> AppResult<u32> {
        self.hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(self.minutes))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "duration {}h {}m is too large",
                    self.hours, self.minutes
                ))
            })
    }
}

impl fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h {:02}m", self.hours, self.minutes)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `total_minutes` covered by `minutes`, in percent (2 decimals).
/// Always 0 when the total is 0.
pub fn to_percentage(minutes: u32, total_minutes: u32) -> f64 {
    if total_minutes == 0 {
        return 0.0;
    }
    round2(minutes as f64 / total_minutes as f64 * 100.0)
}

/// Minutes corresponding to `percentage` of `total_minutes`, split in h/m.
/// Negative and NaN percentages count as 0.
pub fn to_minutes(percentage: f64, total_minutes: u32) -> HoursMinutes {
    let pct = if percentage.is_nan() { 0.0 } else { percentage.max(0.0) };
    let m = (pct / 100.0 * total_minutes as f64).round() as u32;
    split_minutes(m)
}

pub fn split_minutes(minutes: u32) -> HoursMinutes {
    HoursMinutes {
        hours: minutes / 60,
        minutes: minutes % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_zero_total_is_zero() {
        for m in [0, 1, 59, 480, 10_000] {
            assert_eq!(to_percentage(m, 0), 0.0);
        }
    }

    #[test]
    fn half_of_six_hours() {
        assert_eq!(to_percentage(180, 360), 50.0);
    }

    #[test]
    fn percentage_is_rounded_to_two_decimals() {
        // 100 / 480 = 20.8333...
        assert_eq!(to_percentage(100, 480), 20.83);
        // 1 / 3 = 33.333...
        assert_eq!(to_percentage(160, 480), 33.33);
    }

    #[test]
    fn minutes_are_split_into_hours() {
        let hm = to_minutes(25.0, 480);
        assert_eq!(hm, HoursMinutes::new(2, 0));

        let hm = to_minutes(33.33, 480);
        assert_eq!(hm.total_minutes().unwrap(), 160);
        assert_eq!(hm.hours, 2);
        assert_eq!(hm.minutes, 40);
    }

    #[test]
    fn negative_or_nan_percentage_gives_zero_minutes() {
        assert_eq!(to_minutes(-10.0, 480).total_minutes().unwrap(), 0);
        assert_eq!(to_minutes(f64::NAN, 480).total_minutes().unwrap(), 0);
    }

    #[test]
    fn round_trip_drifts_at_most_one_minute() {
        for total in [1u32, 7, 59, 60, 240, 359, 360, 450, 480, 487, 600, 720, 1440] {
            for m in 0..=total {
                let back = to_minutes(to_percentage(m, total), total)
                    .total_minutes()
                    .unwrap();
                assert!(
                    back.abs_diff(m) <= 1,
                    "total={} minutes={} came back as {}",
                    total,
                    m,
                    back
                );
            }
        }
    }

    #[test]
    fn oversized_hours_do_not_overflow() {
        let err = HoursMinutes::new(80_000_000, 0).total_minutes().unwrap_err();
        assert!(err.is_validation());
        assert!(HoursMinutes::new(u32::MAX / 60, 59).total_minutes().is_err());
        assert_eq!(
            HoursMinutes::new(71_582_788, 15).total_minutes().unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(HoursMinutes::new(7, 5).to_string(), "07h 05m");
    }
}
