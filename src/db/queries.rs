use crate::errors::{AppError, AppResult};
use crate::models::allocation::{AllocationEntry, EntryId, WorkRef};
use crate::models::daily_target::DailyTarget;
use crate::models::date_range::DateRange;
use crate::models::reference::{Project, ProjectStatus, Stage, Task};
use crate::store::StoredEntry;
use chrono::{Local, NaiveDate};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn date_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_date_col(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(raw.clone())))
}

/// Append bounds of `range` on `column` to a query that already has a WHERE
/// clause.
///
/// Returns the SQL fragment and the bound values, in order.
pub(crate) fn range_clause(
    range: &DateRange,
    column: &str,
    first_param: usize,
) -> (String, Vec<String>) {
    let mut sql = String::new();
    let mut values = Vec::new();
    let mut idx = first_param;

    if let Some(from) = range.from {
        sql.push_str(&format!(" AND {} >= ?{}", column, idx));
        values.push(date_str(&from));
        idx += 1;
    }
    if let Some(to) = range.to {
        sql.push_str(&format!(" AND {} <= ?{}", column, idx));
        values.push(date_str(&to));
    }

    (sql, values)
}

// ---------------------------------------------------------------------------
// daily_targets
// ---------------------------------------------------------------------------

pub fn map_target(row: &Row) -> Result<DailyTarget> {
    let date = parse_date_col(row, "date")?;
    let total: i64 = row.get("total_minutes")?;
    let total_minutes = u32::try_from(total).map_err(|_| {
        conversion_error(
            0,
            AppError::Validation(format!("invalid total_minutes: {}", total)),
        )
    })?;
    Ok(DailyTarget::new(date, total_minutes))
}

pub fn get_daily_target(
    conn: &Connection,
    user: &str,
    date: &NaiveDate,
) -> AppResult<Option<DailyTarget>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date, total_minutes FROM daily_targets
         WHERE user_id = ?1 AND date = ?2",
    )?;
    let target = stmt
        .query_row(params![user, date_str(date)], map_target)
        .optional()?;
    Ok(target)
}

pub fn upsert_daily_target(
    conn: &Connection,
    user: &str,
    date: &NaiveDate,
    total_minutes: u32,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO daily_targets (user_id, date, total_minutes, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, date) DO UPDATE SET
             total_minutes = excluded.total_minutes,
             updated_at = excluded.updated_at",
        params![
            user,
            date_str(date),
            total_minutes,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// allocations
// ---------------------------------------------------------------------------

pub fn map_entry(row: &Row) -> Result<StoredEntry> {
    let id_str: String = row.get("id")?;
    let id = EntryId::parse(&id_str).map_err(|e| conversion_error(0, e))?;
    let date = parse_date_col(row, "date")?;

    let minutes: i64 = row.get("minutes")?;
    let minutes = u32::try_from(minutes).map_err(|_| {
        conversion_error(
            0,
            AppError::Validation(format!("invalid minutes for {}: {}", id_str, minutes)),
        )
    })?;

    let project: Option<String> = row.get("project_id")?;
    let stage: Option<String> = row.get("stage_id")?;
    let task: Option<String> = row.get("task_id")?;
    let work = WorkRef::new(project.as_deref(), stage.as_deref(), task.as_deref())
        .map_err(|e| conversion_error(0, e))?;

    Ok(StoredEntry {
        id,
        date,
        minutes,
        work,
    })
}

pub fn list_entries(
    conn: &Connection,
    user: &str,
    range: &DateRange,
) -> AppResult<Vec<StoredEntry>> {
    if range.is_empty() {
        return Ok(Vec::new());
    }

    let (clause, values) = range_clause(range, "date", 2);
    let sql = format!(
        "SELECT id, date, minutes, project_id, stage_id, task_id
         FROM allocations
         WHERE user_id = ?1{}
         ORDER BY date ASC, rowid ASC",
        clause
    );

    let mut bound: Vec<&dyn ToSql> = vec![&user];
    bound.extend(values.iter().map(|v| v as &dyn ToSql));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(bound.as_slice(), map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_entries(conn: &Connection, user: &str, date: &NaiveDate) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM allocations WHERE user_id = ?1 AND date = ?2",
        params![user, date_str(date)],
    )?;
    Ok(n)
}

/// Bulk insert inside one transaction: either every row lands or none does.
pub fn insert_entries(
    conn: &mut Connection,
    user: &str,
    date: &NaiveDate,
    entries: &[AllocationEntry],
) -> AppResult<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO allocations
                 (id, user_id, date, minutes, project_id, stage_id, task_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        let day = date_str(date);
        let now = Local::now().to_rfc3339();
        for e in entries {
            stmt.execute(params![
                e.id.to_string(),
                user,
                day,
                e.minutes(),
                e.work.project_ref(),
                e.work.stage_ref(),
                e.work.task_ref(),
                now,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// reference data
// ---------------------------------------------------------------------------

pub fn map_project(row: &Row) -> Result<Project> {
    let status_str: String = row.get("status")?;
    let status = ProjectStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            0,
            AppError::Validation(format!("invalid project status: {}", status_str)),
        )
    })?;

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        status,
    })
}

pub fn list_projects(conn: &Connection, status: ProjectStatus) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, status FROM projects
         WHERE status = ?1
         ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([status.to_db_str()], map_project)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_stages(conn: &Connection, project_ref: &str) -> AppResult<Vec<Stage>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, project_id FROM stages
         WHERE project_id = ?1
         ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([project_ref], |row| {
        Ok(Stage {
            id: row.get("id")?,
            name: row.get("name")?,
            project_id: row.get("project_id")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_tasks(conn: &Connection, stage_ref: &str) -> AppResult<Vec<Task>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, stage_id FROM tasks
         WHERE stage_id = ?1
         ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([stage_ref], |row| {
        Ok(Task {
            id: row.get("id")?,
            name: row.get("name")?,
            stage_id: row.get("stage_id")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn upsert_updates_in_place() {
        let conn = conn();
        upsert_daily_target(&conn, "alice", &d("2025-09-01"), 480).unwrap();
        upsert_daily_target(&conn, "alice", &d("2025-09-01"), 420).unwrap();

        let t = get_daily_target(&conn, "alice", &d("2025-09-01"))
            .unwrap()
            .unwrap();
        assert_eq!(t.total_minutes, 420);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_targets", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);

        assert!(
            get_daily_target(&conn, "bob", &d("2025-09-01"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn entries_are_scoped_by_user_and_range() {
        let mut conn = conn();
        let e1 = AllocationEntry::new(WorkRef::project("p1"), 120, 480);
        let e2 = AllocationEntry::new(
            WorkRef::new(Some("p1"), Some("s1"), Some("t1")).unwrap(),
            60,
            480,
        );
        insert_entries(&mut conn, "alice", &d("2025-09-01"), &[e1.clone()]).unwrap();
        insert_entries(&mut conn, "alice", &d("2025-09-03"), &[e2.clone()]).unwrap();
        insert_entries(&mut conn, "bob", &d("2025-09-01"), &[e2.clone().duplicate_for(480)])
            .unwrap();

        let all = list_entries(&conn, "alice", &DateRange::all()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, e1.id);
        assert_eq!(all[1].work, e2.work);

        let before = list_entries(&conn, "alice", &DateRange::before(d("2025-09-03"))).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].date, d("2025-09-01"));

        assert_eq!(delete_entries(&conn, "alice", &d("2025-09-01")).unwrap(), 1);
        assert_eq!(
            list_entries(&conn, "alice", &DateRange::day(d("2025-09-01")))
                .unwrap()
                .len(),
            0
        );
    }

    #[test]
    fn reference_lists_filter_by_parent() {
        let conn = conn();
        conn.execute_batch(
            "INSERT INTO projects (id, name, status) VALUES
                ('p1', 'Apollo', 'open'), ('p2', 'Zeus', 'closed');
             INSERT INTO stages (id, name, project_id) VALUES
                ('s1', 'Design', 'p1'), ('s2', 'Build', 'p2');
             INSERT INTO tasks (id, name, stage_id) VALUES ('t1', 'Wireframes', 's1');",
        )
        .unwrap();

        let open = list_projects(&conn, ProjectStatus::Open).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].name, "Apollo");

        assert_eq!(list_stages(&conn, "p1").unwrap()[0].id, "s1");
        assert_eq!(list_tasks(&conn, "s1").unwrap()[0].name, "Wireframes");
        assert!(list_tasks(&conn, "s2").unwrap().is_empty());
    }
}
