//! Duration input parsing: `8h`, `7h30m`, `45m`, `1:30`, `90`, `25%`.

use crate::errors::{AppError, AppResult};
use regex::Regex;

/// A duration as typed by the user, before it is tied to a day's target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationInput {
    Minutes(u32),
    Percent(f64),
}

fn regex(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| AppError::Other(format!("invalid pattern: {e}")))
}

fn number(raw: Option<regex::Match>, input: &str) -> AppResult<u32> {
    match raw {
        Some(m) => m
            .as_str()
            .parse::<u32>()
            .map_err(|_| AppError::InvalidDuration(input.to_string())),
        None => Ok(0),
    }
}

fn combine(hours: u32, minutes: u32, input: &str) -> AppResult<DurationInput> {
    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .map(DurationInput::Minutes)
        .ok_or_else(|| AppError::InvalidDuration(input.to_string()))
}

pub fn parse_duration(input: &str) -> AppResult<DurationInput> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err(AppError::InvalidDuration(input.to_string()));
    }

    // 25% / 12.5%
    if let Some(pct) = s.strip_suffix('%') {
        let value: f64 = pct
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidDuration(input.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::InvalidDuration(input.to_string()));
        }
        return Ok(DurationInput::Percent(value));
    }

    // 90
    if s.chars().all(|c| c.is_ascii_digit()) {
        let m = s
            .parse::<u32>()
            .map_err(|_| AppError::InvalidDuration(input.to_string()))?;
        return Ok(DurationInput::Minutes(m));
    }

    // 1:30
    if let Some(caps) = regex(r"^(\d+):([0-5]\d)$")?.captures(&s) {
        let h = number(caps.get(1), input)?;
        let m = number(caps.get(2), input)?;
        return combine(h, m, input);
    }

    // 8h / 7h30m / 45m
    if let Some(caps) = regex(r"^(?:(\d+)h)?\s*(?:(\d+)m)?$")?.captures(&s)
        && (caps.get(1).is_some() || caps.get(2).is_some())
    {
        let h = number(caps.get(1), input)?;
        let m = number(caps.get(2), input)?;
        return combine(h, m, input);
    }

    Err(AppError::InvalidDuration(input.to_string()))
}

/// Absolute durations only (daily targets cannot be percentages).
pub fn parse_minutes(input: &str) -> AppResult<u32> {
    match parse_duration(input)? {
        DurationInput::Minutes(m) => Ok(m),
        DurationInput::Percent(_) => Err(AppError::InvalidDuration(format!(
            "{input} (a percentage is not allowed here)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_forms() {
        assert_eq!(parse_minutes("8h").unwrap(), 480);
        assert_eq!(parse_minutes("7h30m").unwrap(), 450);
        assert_eq!(parse_minutes("7h 30m").unwrap(), 450);
        assert_eq!(parse_minutes("45m").unwrap(), 45);
        assert_eq!(parse_minutes("1:30").unwrap(), 90);
        assert_eq!(parse_minutes("90").unwrap(), 90);
        assert_eq!(parse_duration("25%").unwrap(), DurationInput::Percent(25.0));
    }

    #[test]
    fn rejected_forms() {
        for bad in ["", "h", "abc", "1:75", "-5", "-10%", "8x", "1.5h"] {
            assert!(parse_duration(bad).is_err(), "accepted {bad:?}");
        }
        assert!(parse_minutes("50%").is_err());
    }

    #[test]
    fn malformed_durations_are_validation_errors() {
        for bad in ["abc", "8x", "1:75"] {
            assert!(parse_duration(bad).unwrap_err().is_validation());
        }
        assert!(parse_minutes("50%").unwrap_err().is_validation());
    }
}
