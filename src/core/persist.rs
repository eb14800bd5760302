//! Persistence orchestrator: writes a day back to the record store.
//!
//! A save is three strictly sequential store calls. There is no rollback
//! across steps: when step 3 fails the date keeps its new target and has no
//! entries until `save` is retried.

use crate::errors::{AppError, AppResult};
use crate::models::daily_target::DailyTarget;
use crate::models::day_record::DayRecord;
use crate::store::RecordStore;
use log::{info, warn};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    UpsertTarget,
    DeleteEntries,
    InsertEntries,
}

impl SaveStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStep::UpsertTarget => "upsert_target",
            SaveStep::DeleteEntries => "delete_entries",
            SaveStep::InsertEntries => "insert_entries",
        }
    }
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful [`PersistenceOrchestrator::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub replaced: usize,
    pub inserted: usize,
}

pub struct PersistenceOrchestrator;

impl PersistenceOrchestrator {
    /// Upsert the target, delete the stored entries, insert `record.entries`.
    pub async fn save(
        store: &dyn RecordStore,
        user: &str,
        record: &DayRecord,
    ) -> AppResult<SaveReport> {
        let date = record.date;

        Self::step(SaveStep::UpsertTarget, user, record, async {
            store
                .upsert_daily_target(user, date, record.daily_target.total_minutes)
                .await
        })
        .await?;

        let replaced = Self::step(SaveStep::DeleteEntries, user, record, async {
            store.delete_entries(user, date).await
        })
        .await?;

        Self::step(SaveStep::InsertEntries, user, record, async {
            store.insert_entries(user, date, &record.entries).await
        })
        .await?;

        info!(
            "event=save module=persist status=ok user={} date={} replaced={} inserted={}",
            user,
            date,
            replaced,
            record.entries.len()
        );

        Ok(SaveReport {
            replaced,
            inserted: record.entries.len(),
        })
    }

    /// Step 1 only: persist the day's target and leave entries alone.
    pub async fn save_target(
        store: &dyn RecordStore,
        user: &str,
        target: &DailyTarget,
    ) -> AppResult<()> {
        store
            .upsert_daily_target(user, target.date, target.total_minutes)
            .await
            .map_err(|e| e.at_step(SaveStep::UpsertTarget))?;

        info!(
            "event=save_target module=persist status=ok user={} date={} minutes={}",
            user, target.date, target.total_minutes
        );
        Ok(())
    }

    async fn step<T, F>(step: SaveStep, user: &str, record: &DayRecord, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        fut.await.map_err(|e: AppError| {
            let e = e.at_step(step);
            warn!(
                "event=save module=persist status=error step={} user={} date={} error={}",
                step, user, record.date, e
            );
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::allocation::{AllocationEntry, WorkRef};
    use crate::models::date_range::DateRange;
    use crate::store::SqliteStore;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(date: NaiveDate, total: u32, minutes: &[u32]) -> DayRecord {
        let entries = minutes
            .iter()
            .map(|m| AllocationEntry::new(WorkRef::project("p1"), *m, total))
            .collect();
        DayRecord::new(DailyTarget::new(date, total), entries)
    }

    #[tokio::test]
    async fn save_replaces_entries_wholesale() {
        let store = SqliteStore::in_memory().unwrap();
        let day = d("2025-09-01");

        PersistenceOrchestrator::save(&store, "alice", &record(day, 480, &[120, 60]))
            .await
            .unwrap();
        let report = PersistenceOrchestrator::save(&store, "alice", &record(day, 420, &[300]))
            .await
            .unwrap();
        assert_eq!(
            report,
            SaveReport {
                replaced: 2,
                inserted: 1
            }
        );

        let target = store.get_daily_target("alice", day).await.unwrap().unwrap();
        assert_eq!(target.total_minutes, 420);
        let stored = store.list_entries("alice", DateRange::day(day)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].minutes, 300);
    }

    #[tokio::test]
    async fn failed_insert_leaves_new_target_and_no_entries() {
        let store = SqliteStore::in_memory().unwrap();
        let day = d("2025-09-02");

        PersistenceOrchestrator::save(&store, "alice", &record(day, 480, &[240]))
            .await
            .unwrap();

        store
            .pool
            .lock()
            .unwrap()
            .conn
            .execute_batch(
                "CREATE TRIGGER fail_insert BEFORE INSERT ON allocations
                 BEGIN SELECT RAISE(FAIL, 'insert rejected'); END;",
            )
            .unwrap();

        let err = PersistenceOrchestrator::save(&store, "alice", &record(day, 360, &[60, 60]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::StoreUnavailable {
                step: Some(SaveStep::InsertEntries),
                ..
            }
        ));

        let target = store.get_daily_target("alice", day).await.unwrap().unwrap();
        assert_eq!(target.total_minutes, 360);
        assert!(
            store
                .list_entries("alice", DateRange::day(day))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn save_target_touches_only_the_target() {
        let store = SqliteStore::in_memory().unwrap();
        let day = d("2025-09-03");

        PersistenceOrchestrator::save(&store, "alice", &record(day, 480, &[90]))
            .await
            .unwrap();
        PersistenceOrchestrator::save_target(&store, "alice", &DailyTarget::new(day, 450))
            .await
            .unwrap();

        let target = store.get_daily_target("alice", day).await.unwrap().unwrap();
        assert_eq!(target.total_minutes, 450);
        assert_eq!(
            store
                .list_entries("alice", DateRange::day(day))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
