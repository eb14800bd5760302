use crate::core::converter::{self, HoursMinutes};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Identity of an allocation entry or draft.
/// Persisted as TEXT in `allocations.id`, so loaded entries keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| AppError::Validation(format!("invalid entry id '{}': {}", s, e)))
    }

    /// First 8 hex chars, enough to tell entries of one day apart in listings.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project → stage → task selection.
///
/// A stage can only be set under a project and a task only under a stage;
/// changing an ancestor clears everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkRef {
    project: Option<String>,
    stage: Option<String>,
    task: Option<String>,
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl WorkRef {
    pub fn project(project: &str) -> Self {
        let mut w = Self::default();
        w.set_project(Some(project));
        w
    }

    /// Build a full selection, checking the hierarchy.
    pub fn new(project: Option<&str>, stage: Option<&str>, task: Option<&str>) -> AppResult<Self> {
        let mut w = Self::default();
        w.set_project(project);
        w.set_stage(stage)?;
        w.set_task(task)?;
        Ok(w)
    }

    pub fn project_ref(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn stage_ref(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn task_ref(&self) -> Option<&str> {
        self.task.as_deref()
    }

    pub fn has_project(&self) -> bool {
        self.project.is_some()
    }

    /// Set (or clear) the project. Stage and task are cleared whenever the
    /// project actually changes.
    pub fn set_project(&mut self, project: Option<&str>) {
        let project = normalize(project);
        if project != self.project {
            self.stage = None;
            self.task = None;
        }
        self.project = project;
    }

    /// Set (or clear) the stage. Requires a project; clears the task when the
    /// stage changes.
    pub fn set_stage(&mut self, stage: Option<&str>) -> AppResult<()> {
        let stage = normalize(stage);
        if stage.is_some() && self.project.is_none() {
            return Err(AppError::Validation(
                "a stage requires a project to be selected first".into(),
            ));
        }
        if stage != self.stage {
            self.task = None;
        }
        self.stage = stage;
        Ok(())
    }

    /// Set (or clear) the task. Requires a stage.
    pub fn set_task(&mut self, task: Option<&str>) -> AppResult<()> {
        let task = normalize(task);
        if task.is_some() && self.stage.is_none() {
            return Err(AppError::Validation(
                "a task requires a stage to be selected first".into(),
            ));
        }
        self.task = task;
        Ok(())
    }
}

impl fmt::Display for WorkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [self.project_ref(), self.stage_ref(), self.task_ref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            write!(f, "--")
        } else {
            write!(f, "{}", parts.join("/"))
        }
    }
}

/// One labeled duration of a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationEntry {
    pub id: EntryId,
    pub work: WorkRef,
    minutes: u32,
    percentage: f64,
}

/// A staged, not yet committed allocation. Same shape as a committed entry;
/// what makes it a draft is the collection it lives in.
pub type DraftEntry = AllocationEntry;

impl AllocationEntry {
    /// New entry with a fresh id and the percentage derived from `minutes`.
    pub fn new(work: WorkRef, minutes: u32, total_minutes: u32) -> Self {
        Self::with_id(EntryId::generate(), work, minutes, total_minutes)
    }

    pub fn with_id(id: EntryId, work: WorkRef, minutes: u32, total_minutes: u32) -> Self {
        Self {
            id,
            work,
            minutes,
            percentage: converter::to_percentage(minutes, total_minutes),
        }
    }

    /// New entry sized as a percentage of the day.
    pub fn from_percentage(work: WorkRef, percentage: f64, total_minutes: u32) -> AppResult<Self> {
        let mut e = Self::new(work, 0, total_minutes);
        e.set_percentage(percentage, total_minutes)?;
        Ok(e)
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn duration(&self) -> HoursMinutes {
        converter::split_minutes(self.minutes)
    }

    /// Edit hours/minutes; the percentage follows. An overflowing duration
    /// is rejected and the entry keeps its value.
    pub fn set_duration(&mut self, hours: u32, minutes: u32, total_minutes: u32) -> AppResult<()> {
        self.minutes = HoursMinutes::new(hours, minutes).total_minutes()?;
        self.recompute_percentage(total_minutes);
        Ok(())
    }

    /// Edit the percentage; hours/minutes follow, then the percentage is
    /// re-derived from the rounded minutes.
    pub fn set_percentage(&mut self, percentage: f64, total_minutes: u32) -> AppResult<()> {
        if !percentage.is_finite() || percentage < 0.0 {
            return Err(AppError::Validation(format!(
                "percentage must be a non-negative number, got {}",
                percentage
            )));
        }
        self.minutes = converter::to_minutes(percentage, total_minutes).total_minutes()?;
        self.recompute_percentage(total_minutes);
        Ok(())
    }

    pub fn recompute_percentage(&mut self, total_minutes: u32) {
        self.percentage = converter::to_percentage(self.minutes, total_minutes);
    }

    /// Copy with a fresh identity, percentage computed against another day.
    pub fn duplicate_for(&self, total_minutes: u32) -> DraftEntry {
        Self::new(self.work.clone(), self.minutes, total_minutes)
    }

    /// Entries need a project and a positive duration to be admitted.
    pub fn is_admissible(&self) -> bool {
        self.work.has_project() && self.minutes > 0
    }
}
