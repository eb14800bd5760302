//! Editing session for one (user, date).
//!
//! Owns the committed list, the draft staging area and the workflow state.
//! Every operation validates first and mutates last, so a rejected call
//! leaves the session exactly as it was.

use crate::core::duplicate::DuplicationService;
use crate::core::persist::{PersistenceOrchestrator, SaveReport};
use crate::core::staging::{CommitReport, DraftStaging};
use crate::core::validation::{self, total_minutes, validate_addition};
use crate::errors::{AppError, AppResult};
use crate::models::allocation::{AllocationEntry, DraftEntry, EntryId, WorkRef};
use crate::models::daily_target::DailyTarget;
use crate::models::date_range::DateRange;
use crate::models::day_record::DayRecord;
use crate::store::RecordStore;
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

/// Longest target a day can carry.
pub const MAX_TARGET_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    NoTarget,
    TargetSet,
    Staging,
    Saved,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::NoTarget => "no target",
            WorkflowState::TargetSet => "target set",
            WorkflowState::Staging => "staging",
            WorkflowState::Saved => "saved",
        }
    }
}

/// Result of [`EditingSession::duplicate_previous`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateReport {
    pub source_date: Option<NaiveDate>,
    pub staged: usize,
}

pub struct EditingSession<'s> {
    store: &'s dyn RecordStore,
    user: String,
    date: NaiveDate,
    target: Option<DailyTarget>,
    committed: Vec<AllocationEntry>,
    staging: DraftStaging,
    state: WorkflowState,
}

impl<'s> EditingSession<'s> {
    /// Load the day's target and entries from the store.
    pub async fn open(store: &'s dyn RecordStore, user: &str, date: NaiveDate) -> AppResult<Self> {
        let target = store.get_daily_target(user, date).await?;
        let total = target.map(|t| t.total_minutes).unwrap_or(0);

        let committed: Vec<AllocationEntry> = store
            .list_entries(user, DateRange::day(date))
            .await?
            .iter()
            .map(|e| e.to_entry(total))
            .collect();

        let state = match (&target, committed.is_empty()) {
            (None, _) => WorkflowState::NoTarget,
            (Some(_), true) => WorkflowState::TargetSet,
            (Some(_), false) => WorkflowState::Saved,
        };

        debug!(
            "event=session_open module=session user={} date={} state={} entries={}",
            user,
            date,
            state.as_str(),
            committed.len()
        );

        Ok(Self {
            store,
            user: user.to_string(),
            date,
            target,
            committed,
            staging: DraftStaging::new(),
            state,
        })
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn target(&self) -> Option<DailyTarget> {
        self.target
    }

    pub fn committed(&self) -> &[AllocationEntry] {
        &self.committed
    }

    pub fn drafts(&self) -> &[DraftEntry] {
        self.staging.drafts()
    }

    /// Committed plus staged minutes.
    pub fn allocated_minutes(&self) -> u64 {
        total_minutes(&self.committed) + self.staging.total_minutes()
    }

    pub fn remaining_minutes(&self) -> i64 {
        let total = self.target.map(|t| t.total_minutes).unwrap_or(0);
        total as i64 - self.allocated_minutes() as i64
    }

    fn require_target(&self) -> AppResult<DailyTarget> {
        self.target.ok_or_else(|| {
            AppError::Validation(format!("no daily target confirmed for {}", self.date))
        })
    }

    /// Confirm (or change) the day's target. Every percentage follows.
    pub fn confirm_target(&mut self, total_minutes: u32) -> AppResult<()> {
        if total_minutes == 0 {
            return Err(AppError::Validation(
                "the daily target must be greater than zero".into(),
            ));
        }
        if total_minutes > MAX_TARGET_MINUTES {
            return Err(AppError::Validation(format!(
                "the daily target cannot exceed {} minutes",
                MAX_TARGET_MINUTES
            )));
        }
        let allocated = self.allocated_minutes();
        if allocated > total_minutes as u64 {
            return Err(AppError::Validation(format!(
                "target of {} min is below the {} min already allocated",
                total_minutes, allocated
            )));
        }

        let changed = self.target.map(|t| t.total_minutes) != Some(total_minutes);
        self.target = Some(DailyTarget::new(self.date, total_minutes));
        for e in &mut self.committed {
            e.recompute_percentage(total_minutes);
        }
        self.staging.recompute_percentages(total_minutes);

        self.state = match self.state {
            WorkflowState::NoTarget => WorkflowState::TargetSet,
            WorkflowState::Saved if changed => WorkflowState::Staging,
            other => other,
        };
        Ok(())
    }

    /// Build an entry sized in minutes against the confirmed target.
    pub fn entry(&self, work: WorkRef, minutes: u32) -> AppResult<AllocationEntry> {
        let target = self.require_target()?;
        Ok(AllocationEntry::new(work, minutes, target.total_minutes))
    }

    /// Build an entry sized as a percentage of the confirmed target.
    pub fn entry_from_percentage(&self, work: WorkRef, percentage: f64) -> AppResult<AllocationEntry> {
        let target = self.require_target()?;
        AllocationEntry::from_percentage(work, percentage, target.total_minutes)
    }

    /// Admit an entry straight into the committed list.
    pub fn add_entry(&mut self, entry: AllocationEntry) -> AppResult<EntryId> {
        let target = self.require_target()?;
        validation::validate_candidate(&entry)?;
        validate_addition(
            total_minutes(&self.committed),
            self.staging.total_minutes(),
            entry.minutes() as u64,
            target.total_minutes as u64,
        )?;

        let mut entry = entry;
        entry.recompute_percentage(target.total_minutes);
        let id = entry.id;
        self.committed.push(entry);
        self.state = WorkflowState::Staging;
        Ok(id)
    }

    pub fn add_draft(&mut self, draft: DraftEntry) -> AppResult<EntryId> {
        let target = self.require_target()?;
        let mut draft = draft;
        draft.recompute_percentage(target.total_minutes);
        let id = draft.id;
        self.staging
            .add(draft, &self.committed, target.total_minutes)?;
        self.state = WorkflowState::Staging;
        Ok(id)
    }

    pub fn remove_entry(&mut self, id: &EntryId) -> AppResult<AllocationEntry> {
        self.require_target()?;
        let idx = self
            .committed
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| AppError::Validation(format!("no entry with id {}", id)))?;
        let removed = self.committed.remove(idx);
        self.state = WorkflowState::Staging;
        Ok(removed)
    }

    pub fn remove_draft(&mut self, id: &EntryId) -> AppResult<DraftEntry> {
        self.require_target()?;
        let removed = self
            .staging
            .remove(id)
            .ok_or_else(|| AppError::Validation(format!("no draft with id {}", id)))?;
        self.state = WorkflowState::Staging;
        Ok(removed)
    }

    /// Remove whatever carries `id`, committed entry or draft.
    pub fn remove(&mut self, id: &EntryId) -> AppResult<AllocationEntry> {
        if self.committed.iter().any(|e| &e.id == id) {
            self.remove_entry(id)
        } else {
            self.remove_draft(id)
        }
    }

    /// Stage the entries of the latest earlier day with data. The copied
    /// batch is admitted whole or not at all.
    pub async fn duplicate_previous(&mut self) -> AppResult<DuplicateReport> {
        let target = self.require_target()?;
        let dup = DuplicationService::previous_day(
            self.store,
            &self.user,
            self.date,
            target.total_minutes,
        )
        .await?;

        if dup.drafts.is_empty() {
            return Ok(DuplicateReport {
                source_date: None,
                staged: 0,
            });
        }

        let staged = self
            .staging
            .add_batch(dup.drafts, &self.committed, target.total_minutes)?;
        self.state = WorkflowState::Staging;

        Ok(DuplicateReport {
            source_date: dup.source_date,
            staged,
        })
    }

    pub fn commit_drafts(&mut self) -> AppResult<CommitReport> {
        self.require_target()?;
        let report = self.staging.commit_all(&mut self.committed);
        if report.committed + report.discarded > 0 {
            self.state = WorkflowState::Staging;
        }
        if report.discarded > 0 {
            debug!(
                "event=commit module=session user={} date={} discarded={}",
                self.user, self.date, report.discarded
            );
        }
        Ok(report)
    }

    /// The day as it would be persisted: target plus committed entries.
    pub fn record(&self) -> AppResult<DayRecord> {
        let target = self.require_target()?;
        Ok(DayRecord::new(target, self.committed.clone()))
    }

    /// Persist target and committed entries. Drafts are not saved.
    pub async fn save(&mut self) -> AppResult<SaveReport> {
        let record = self.record()?;
        let report = PersistenceOrchestrator::save(self.store, &self.user, &record).await?;
        self.state = WorkflowState::Saved;
        Ok(report)
    }

    /// Persist the target only; the session keeps its state.
    pub async fn save_target(&mut self) -> AppResult<()> {
        let target = self.require_target()?;
        PersistenceOrchestrator::save_target(self.store, &self.user, &target).await
    }

    /// Drop the session without touching the store. Returns how many drafts
    /// were discarded.
    pub fn close(self) -> usize {
        let discarded = self.staging.len();
        info!(
            "event=session_close module=session user={} date={} state={} discarded_drafts={}",
            self.user,
            self.date,
            self.state.as_str(),
            discarded
        );
        discarded
    }
}
