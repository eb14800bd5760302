//! Record-store contract consumed by the allocation engine.
//!
//! Every call is asynchronous and may fail with `StoreUnavailable`; nothing
//! in here retries.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::errors::AppResult;
use crate::models::allocation::{AllocationEntry, EntryId, WorkRef};
use crate::models::daily_target::DailyTarget;
use crate::models::date_range::DateRange;
use crate::models::reference::{Project, ProjectStatus, Stage, Task};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// One allocation row as persisted for a (user, date).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub minutes: u32,
    pub work: WorkRef,
}

impl StoredEntry {
    /// Rebuild the in-memory entry, percentage taken against `total_minutes`.
    pub fn to_entry(&self, total_minutes: u32) -> AllocationEntry {
        AllocationEntry::with_id(self.id, self.work.clone(), self.minutes, total_minutes)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `None` when the day has no target yet.
    async fn get_daily_target(&self, user: &str, date: NaiveDate)
    -> AppResult<Option<DailyTarget>>;

    /// Insert, or update in place when (user, date) already exists.
    async fn upsert_daily_target(
        &self,
        user: &str,
        date: NaiveDate,
        total_minutes: u32,
    ) -> AppResult<()>;

    async fn list_entries(&self, user: &str, range: DateRange) -> AppResult<Vec<StoredEntry>>;

    /// Returns the number of rows removed.
    async fn delete_entries(&self, user: &str, date: NaiveDate) -> AppResult<usize>;

    async fn insert_entries(
        &self,
        user: &str,
        date: NaiveDate,
        entries: &[AllocationEntry],
    ) -> AppResult<()>;

    async fn list_projects(&self, status: ProjectStatus) -> AppResult<Vec<Project>>;

    async fn list_stages(&self, project_ref: &str) -> AppResult<Vec<Stage>>;

    async fn list_tasks(&self, stage_ref: &str) -> AppResult<Vec<Task>>;
}
