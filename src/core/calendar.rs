//! Calendar status rollup.
//!
//! Days are classified against a fixed 8h threshold, not against each day's
//! own target: a day targeted at 4h and fully logged stays `Partial`.

use crate::errors::AppResult;
use crate::models::date_range::DateRange;
use crate::models::day_status::DayStatus;
use crate::store::{RecordStore, StoredEntry};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

/// Logged minutes at which a day counts as complete.
pub const COMPLETE_DAY_MINUTES: u64 = 480;

pub fn classify(total_minutes: u64) -> DayStatus {
    if total_minutes == 0 {
        DayStatus::Empty
    } else if total_minutes < COMPLETE_DAY_MINUTES {
        DayStatus::Partial
    } else {
        DayStatus::Complete
    }
}

/// Minutes logged per date, for dates that have at least one entry.
pub fn minutes_by_date(entries: &[StoredEntry]) -> BTreeMap<NaiveDate, u64> {
    let mut totals = BTreeMap::new();
    for e in entries {
        *totals.entry(e.date).or_insert(0) += e.minutes as u64;
    }
    totals
}

pub struct CalendarAggregator;

impl CalendarAggregator {
    /// Status of every date of `range` (which must be bounded), from a single
    /// range query.
    pub async fn statuses(
        store: &dyn RecordStore,
        user: &str,
        range: DateRange,
    ) -> AppResult<BTreeMap<NaiveDate, DayStatus>> {
        let entries = store.list_entries(user, range).await?;
        let totals = minutes_by_date(&entries);

        debug!(
            "event=calendar module=calendar status=ok user={} entries={} days_with_data={}",
            user,
            entries.len(),
            totals.len()
        );

        Ok(range
            .days()
            .into_iter()
            .map(|day| (day, classify(totals.get(&day).copied().unwrap_or(0))))
            .collect())
    }
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

    async fn seed(store: &SqliteStore, date: NaiveDate, target: u32, minutes: &[u32]) {
        let entries = minutes
            .iter()
            .map(|m| AllocationEntry::new(WorkRef::project("p1"), *m, target))
            .collect();
        PersistenceOrchestrator::save(
            store,
            "alice",
            &DayRecord::new(DailyTarget::new(date, target), entries),
        )
        .await
        .unwrap();
    }

    #[test]
    fn thresholds() {
        assert_eq!(classify(0), DayStatus::Empty);
        assert_eq!(classify(1), DayStatus::Partial);
        assert_eq!(classify(479), DayStatus::Partial);
        assert_eq!(classify(480), DayStatus::Complete);
        assert_eq!(classify(600), DayStatus::Complete);
    }

    #[tokio::test]
    async fn month_rollup_covers_every_day() {
        let store = SqliteStore::in_memory().unwrap();
        seed(&store, d("2025-09-01"), 480, &[240, 240]).await;
        seed(&store, d("2025-09-02"), 480, &[120]).await;

        let range = DateRange::month_of(d("2025-09-15"));
        let statuses = CalendarAggregator::statuses(&store, "alice", range)
            .await
            .unwrap();

        assert_eq!(statuses.len(), 30);
        assert_eq!(statuses[&d("2025-09-01")], DayStatus::Complete);
        assert_eq!(statuses[&d("2025-09-02")], DayStatus::Partial);
        assert_eq!(statuses[&d("2025-09-03")], DayStatus::Empty);
    }

    #[tokio::test]
    async fn short_target_fully_logged_is_still_partial() {
        let store = SqliteStore::in_memory().unwrap();
        seed(&store, d("2025-09-04"), 240, &[240]).await;

        let statuses =
            CalendarAggregator::statuses(&store, "alice", DateRange::day(d("2025-09-04")))
                .await
                .unwrap();
        assert_eq!(statuses[&d("2025-09-04")], DayStatus::Partial);
    }
}
