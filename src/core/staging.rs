//! Draft staging area: allocations waiting for confirmation.
//!
//! Drafts live in their own collection, separate from the committed list
//! owned by the editing session. Every admission is checked against the
//! daily cap with both collections counted.

use crate::core::validation::{self, total_minutes, validate_addition};
use crate::errors::AppResult;
use crate::models::allocation::{AllocationEntry, DraftEntry, EntryId};

/// Outcome of [`DraftStaging::commit_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitReport {
    pub committed: usize,
    pub discarded: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DraftStaging {
    drafts: Vec<DraftEntry>,
}

impl DraftStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> &[DraftEntry] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn total_minutes(&self) -> u64 {
        total_minutes(&self.drafts)
    }

    /// Stage one draft after the cap check. Nothing changes on failure.
    pub fn add(
        &mut self,
        draft: DraftEntry,
        committed: &[AllocationEntry],
        daily_total_minutes: u32,
    ) -> AppResult<()> {
        validation::validate_candidate(&draft)?;
        validate_addition(
            total_minutes(committed),
            self.total_minutes(),
            draft.minutes() as u64,
            daily_total_minutes as u64,
        )?;
        self.drafts.push(draft);
        Ok(())
    }

    /// Stage several drafts at once: the batch is checked as a whole and
    /// admitted entirely or not at all.
    pub fn add_batch(
        &mut self,
        batch: Vec<DraftEntry>,
        committed: &[AllocationEntry],
        daily_total_minutes: u32,
    ) -> AppResult<usize> {
        for d in &batch {
            validation::validate_candidate(d)?;
        }
        validate_addition(
            total_minutes(committed),
            self.total_minutes(),
            total_minutes(&batch),
            daily_total_minutes as u64,
        )?;
        let n = batch.len();
        self.drafts.extend(batch);
        Ok(n)
    }

    pub fn remove(&mut self, id: &EntryId) -> Option<DraftEntry> {
        let idx = self.drafts.iter().position(|d| &d.id == id)?;
        Some(self.drafts.remove(idx))
    }

    /// Move every admissible draft (project set, minutes > 0) to `committed`
    /// and empty the staging area. Other drafts are dropped.
    pub fn commit_all(&mut self, committed: &mut Vec<AllocationEntry>) -> CommitReport {
        let staged = std::mem::take(&mut self.drafts);
        let (valid, dropped): (Vec<_>, Vec<_>) =
            staged.into_iter().partition(AllocationEntry::is_admissible);

        let report = CommitReport {
            committed: valid.len(),
            discarded: dropped.len(),
        };
        committed.extend(valid);
        report
    }

    pub fn recompute_percentages(&mut self, total_minutes: u32) {
        for d in &mut self.drafts {
            d.recompute_percentage(total_minutes);
        }
    }
}
