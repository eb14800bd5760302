//! Seed drafts from the most recent earlier day that has entries.

use crate::errors::AppResult;
use crate::models::allocation::DraftEntry;
use crate::models::date_range::DateRange;
use crate::store::{RecordStore, StoredEntry};
use chrono::NaiveDate;
use log::{debug, info};

/// Drafts copied from a source day.
#[derive(Debug, Clone, Default)]
pub struct Duplication {
    /// `None` when no earlier day has entries.
    pub source_date: Option<NaiveDate>,
    pub drafts: Vec<DraftEntry>,
}

pub struct DuplicationService;

impl DuplicationService {
    /// Entries of the latest date strictly before `date`, as fresh drafts
    /// whose percentage is computed against `target_total_minutes`.
    pub async fn previous_day(
        store: &dyn RecordStore,
        user: &str,
        date: NaiveDate,
        target_total_minutes: u32,
    ) -> AppResult<Duplication> {
        let history = store.list_entries(user, DateRange::before(date)).await?;

        let Some(source_date) = latest_date(&history) else {
            debug!(
                "event=duplicate module=duplicate status=empty user={} date={}",
                user, date
            );
            return Ok(Duplication::default());
        };

        let drafts: Vec<DraftEntry> = history
            .iter()
            .filter(|e| e.date == source_date)
            .map(|e| DraftEntry::new(e.work.clone(), e.minutes, target_total_minutes))
            .collect();

        info!(
            "event=duplicate module=duplicate status=ok user={} date={} source={} drafts={}",
            user,
            date,
            source_date,
            drafts.len()
        );

        Ok(Duplication {
            source_date: Some(source_date),
            drafts,
        })
    }
}

fn latest_date(history: &[StoredEntry]) -> Option<NaiveDate> {
    history.iter().map(|e| e.date).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persist::PersistenceOrchestrator;
    use crate::models::allocation::{AllocationEntry, WorkRef};
    use crate::models::daily_target::DailyTarget;
    use crate::models::day_record::DayRecord;
    use crate::store::SqliteStore;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn seed(store: &SqliteStore, date: NaiveDate, total: u32, items: &[(&str, u32)]) {
        let entries = items
            .iter()
            .map(|(p, m)| AllocationEntry::new(WorkRef::project(p), *m, total))
            .collect();
        let record = DayRecord::new(DailyTarget::new(date, total), entries);
        PersistenceOrchestrator::save(store, "alice", &record)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_history_is_a_no_op() {
        let store = SqliteStore::in_memory().unwrap();
        let dup = DuplicationService::previous_day(&store, "alice", d("2025-09-10"), 480)
            .await
            .unwrap();
        assert!(dup.source_date.is_none());
        assert!(dup.drafts.is_empty());
    }

    #[tokio::test]
    async fn picks_latest_prior_day_and_recomputes_percentages() {
        let store = SqliteStore::in_memory().unwrap();
        seed(&store, d("2025-09-01"), 480, &[("old", 480)]).await;
        seed(&store, d("2025-09-05"), 480, &[("p1", 240), ("p2", 120)]).await;
        seed(&store, d("2025-09-12"), 480, &[("future", 60)]).await;

        let dup = DuplicationService::previous_day(&store, "alice", d("2025-09-10"), 240)
            .await
            .unwrap();

        assert_eq!(dup.source_date, Some(d("2025-09-05")));
        assert_eq!(dup.drafts.len(), 2);
        assert_eq!(dup.drafts[0].work.project_ref(), Some("p1"));
        assert_eq!(dup.drafts[0].minutes(), 240);
        assert_eq!(dup.drafts[0].percentage(), 100.0);
        assert_eq!(dup.drafts[1].percentage(), 50.0);

        let stored = store
            .list_entries("alice", DateRange::day(d("2025-09-05")))
            .await
            .unwrap();
        assert!(dup.drafts.iter().all(|dr| stored.iter().all(|s| s.id != dr.id)));
    }

    #[tokio::test]
    async fn other_users_history_is_ignored() {
        let store = SqliteStore::in_memory().unwrap();
        seed(&store, d("2025-09-05"), 480, &[("p1", 60)]).await;

        let dup = DuplicationService::previous_day(&store, "bob", d("2025-09-10"), 480)
            .await
            .unwrap();
        assert!(dup.drafts.is_empty());
    }
}
