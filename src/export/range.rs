// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::models::date_range::DateRange;
use crate::utils::date::parse_month;
use chrono::NaiveDate;

fn invalid(r: &str, why: &str) -> AppError {
    AppError::InvalidDate(format!("{r} ({why})"))
}

/// First (`end == false`) or last (`end == true`) day covered by a
/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` expression.
fn bound(s: &str, end: bool) -> AppResult<NaiveDate> {
    match s.len() {
        4 => {
            let y: i32 = s.parse().map_err(|_| invalid(s, "invalid year"))?;
            let (m, d) = if end { (12, 31) } else { (1, 1) };
            NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| invalid(s, "invalid year"))
        }
        7 => {
            let first = parse_month(s)?;
            if end {
                DateRange::month_of(first)
                    .to
                    .ok_or_else(|| invalid(s, "invalid month"))
            } else {
                Ok(first)
            }
        }
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid(s, "invalid date")),
        _ => Err(invalid(s, "unsupported --range format")),
    }
}

/// Parse `--range`.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
///
/// `all` means no bounds.
pub fn parse_range(r: &str) -> AppResult<DateRange> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("all") {
        return Ok(DateRange::all());
    }

    let (start, end) = match r.split_once(':') {
        Some((s, e)) => (s.trim(), e.trim()),
        None => (r, r),
    };
    if start.len() != end.len() {
        return Err(invalid(r, "start and end must have same format"));
    }

    let range = DateRange::between(bound(start, false)?, bound(end, true)?);
    if range.is_empty() {
        return Err(invalid(r, "start is after end"));
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_expressions() {
        assert_eq!(
            parse_range("2024").unwrap(),
            DateRange::between(d("2024-01-01"), d("2024-12-31"))
        );
        assert_eq!(
            parse_range("2024-02").unwrap(),
            DateRange::between(d("2024-02-01"), d("2024-02-29"))
        );
        assert_eq!(
            parse_range("2025-09-03").unwrap(),
            DateRange::day(d("2025-09-03"))
        );
        assert_eq!(parse_range("all").unwrap(), DateRange::all());
    }

    #[test]
    fn intervals() {
        assert_eq!(
            parse_range("2025-01:2025-03").unwrap(),
            DateRange::between(d("2025-01-01"), d("2025-03-31"))
        );
        assert!(parse_range("2025:2025-03").is_err());
        assert!(parse_range("2025-03-10:2025-03-01").is_err());
        assert!(parse_range("25").is_err());
    }
}
