use crate::core::calendar::{classify, minutes_by_date};
use crate::errors::AppResult;
use crate::models::date_range::DateRange;
use crate::models::day_status::DayStatus;
use crate::models::reference::ProjectStatus;
use crate::store::RecordStore;
use serde::Serialize;
use std::collections::BTreeSet;

/// Quick statistics over a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub total_minutes: u64,
    pub days_worked: usize,
    pub complete_days: usize,
    pub partial_days: usize,
    pub projects_allocated: usize,
    pub open_projects: usize,
}

pub struct SummaryLogic;

impl SummaryLogic {
    pub async fn summarize(
        store: &dyn RecordStore,
        user: &str,
        range: DateRange,
    ) -> AppResult<RangeSummary> {
        let entries = store.list_entries(user, range).await?;
        let open_projects = store.list_projects(ProjectStatus::Open).await?.len();

        let per_day = minutes_by_date(&entries);
        let projects: BTreeSet<&str> = entries
            .iter()
            .filter_map(|e| e.work.project_ref())
            .collect();

        let mut summary = RangeSummary {
            total_minutes: per_day.values().sum(),
            days_worked: per_day.values().filter(|m| **m > 0).count(),
            projects_allocated: projects.len(),
            open_projects,
            ..Default::default()
        };

        for minutes in per_day.values() {
            match classify(*minutes) {
                DayStatus::Complete => summary.complete_days += 1,
                DayStatus::Partial => summary.partial_days += 1,
                DayStatus::Empty => {}
            }
        }

        Ok(summary)
    }
}
