use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Inclusive date interval; an open bound means "unbounded on that side".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Every date strictly before `date`.
    pub fn before(date: NaiveDate) -> Self {
        match date.pred_opt() {
            Some(prev) => Self {
                from: None,
                to: Some(prev),
            },
            None => Self::between(NaiveDate::MAX, NaiveDate::MIN),
        }
    }

    /// First to last day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(first);
        Self::between(first, last)
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.from, self.to), (Some(f), Some(t)) if f > t)
    }

    /// All dates of a bounded range, in order. Unbounded ranges yield nothing.
    pub fn days(&self) -> Vec<NaiveDate> {
        let (Some(from), Some(to)) = (self.from, self.to) else {
            return Vec::new();
        };
        from.iter_days().take_while(|d| *d <= to).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn before_excludes_the_date_itself() {
        let r = DateRange::before(d("2025-09-10"));
        assert_eq!(r.from, None);
        assert_eq!(r.to, Some(d("2025-09-09")));
    }

    #[test]
    fn month_of_covers_whole_month() {
        let r = DateRange::month_of(d("2024-02-17"));
        assert_eq!(r.from, Some(d("2024-02-01")));
        assert_eq!(r.to, Some(d("2024-02-29")));
        assert_eq!(r.days().len(), 29);

        let dec = DateRange::month_of(d("2025-12-31"));
        assert_eq!(dec.to, Some(d("2025-12-31")));
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = DateRange::between(d("2025-09-10"), d("2025-09-01"));
        assert!(r.is_empty());
        assert!(r.days().is_empty());
    }
}
