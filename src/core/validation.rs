//! Daily-cap checks run before any entry or draft is admitted.

use crate::errors::{AppError, AppResult};
use crate::models::allocation::AllocationEntry;

/// Reject `candidate_minutes` when committed + staged + candidate would
/// exceed the day's target. Drafts count toward the cap.
pub fn validate_addition(
    committed_total: u64,
    draft_total: u64,
    candidate_minutes: u64,
    daily_total_minutes: u64,
) -> AppResult<()> {
    let allocated = committed_total + draft_total;
    if allocated + candidate_minutes > daily_total_minutes {
        return Err(AppError::OverCapacity {
            requested: candidate_minutes,
            allocated,
            target: daily_total_minutes,
        });
    }
    Ok(())
}

/// Shape checks on a single candidate, before capacity is considered.
pub fn validate_candidate(entry: &AllocationEntry) -> AppResult<()> {
    if !entry.work.has_project() {
        return Err(AppError::Validation("a project is required".into()));
    }
    if entry.minutes() == 0 {
        return Err(AppError::Validation(
            "duration must be greater than zero".into(),
        ));
    }
    Ok(())
}

pub fn total_minutes<'a, I>(entries: I) -> u64
where
    I: IntoIterator<Item = &'a AllocationEntry>,
{
    entries.into_iter().map(|e| e.minutes() as u64).sum()
}
