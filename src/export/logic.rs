// src/export/logic.rs

use crate::core::converter;
use crate::db::pool::DbPool;
use crate::db::queries::range_clause;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::AllocationExport;
use crate::export::range::parse_range;
use crate::models::date_range::DateRange;
use crate::ui::messages::warning;
use crate::utils::path::is_absolute;
use log::info;
use rusqlite::Row;
use rusqlite::types::ToSql;
use std::path::Path;

/// High-level export of allocation rows.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the allocations of `user`.
    ///
    /// - `file`: absolute output path
    /// - `range`: `None`, `"all"` or any expression accepted by `parse_range`
    ///
    /// Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        user: &str,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        force: bool,
    ) -> AppResult<usize> {
        if !is_absolute(file) {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }
        let path = Path::new(file);

        let bounds = match range {
            None => DateRange::all(),
            Some(r) => parse_range(r)?,
        };

        let rows = load_rows(pool, user, &bounds)?;
        if rows.is_empty() {
            warning("No allocations found for selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        info!(
            "event=export module=export status=ok user={} format={} rows={}",
            user,
            format.as_str(),
            rows.len()
        );
        Ok(rows.len())
    }
}

fn map_row(row: &Row) -> rusqlite::Result<AllocationExport> {
    let minutes: u32 = row.get("minutes")?;
    let target_minutes: u32 = row.get("target_minutes")?;
    let text = |col: &str| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(col)?.unwrap_or_default())
    };

    Ok(AllocationExport {
        date: row.get("date")?,
        target_minutes,
        minutes,
        hours: converter::split_minutes(minutes).to_string(),
        percentage: converter::to_percentage(minutes, target_minutes),
        project_id: text("project_id")?,
        project_name: text("project_name")?,
        stage_id: text("stage_id")?,
        stage_name: text("stage_name")?,
        task_id: text("task_id")?,
        task_name: text("task_name")?,
        entry_id: row.get("id")?,
    })
}

/// Allocation rows joined with the day's target and reference names.
fn load_rows(
    pool: &mut DbPool,
    user: &str,
    range: &DateRange,
) -> AppResult<Vec<AllocationExport>> {
    let (clause, values) = range_clause(range, "a.date", 2);
    let sql = format!(
        "SELECT a.id, a.date, a.minutes,
                COALESCE(dt.total_minutes, 0) AS target_minutes,
                a.project_id, p.name AS project_name,
                a.stage_id, s.name AS stage_name,
                a.task_id, t.name AS task_name
         FROM allocations a
         LEFT JOIN daily_targets dt ON dt.user_id = a.user_id AND dt.date = a.date
         LEFT JOIN projects p ON p.id = a.project_id
         LEFT JOIN stages s ON s.id = a.stage_id
         LEFT JOIN tasks t ON t.id = a.task_id
         WHERE a.user_id = ?1{}
         ORDER BY a.date ASC, a.rowid ASC",
        clause
    );

    let mut bound: Vec<&dyn ToSql> = vec![&user];
    bound.extend(values.iter().map(|v| v as &dyn ToSql));

    let mut stmt = pool.conn.prepare(&sql)?;
    let rows = stmt.query_map(bound.as_slice(), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool.conn
            .execute_batch(
                "INSERT INTO projects (id, name, status) VALUES ('p1', 'Apollo', 'open');
                 INSERT INTO stages (id, name, project_id) VALUES ('s1', 'Design', 'p1');
                 INSERT INTO daily_targets (user_id, date, total_minutes, updated_at)
                    VALUES ('alice', '2025-09-01', 480, 'x'), ('alice', '2025-10-01', 240, 'x');
                 INSERT INTO allocations (id, user_id, date, minutes, project_id, stage_id, task_id, created_at)
                    VALUES ('00000000-0000-0000-0000-000000000001', 'alice', '2025-09-01', 120, 'p1', 's1', NULL, 'x'),
                           ('00000000-0000-0000-0000-000000000002', 'alice', '2025-10-01', 60, 'p1', NULL, NULL, 'x'),
                           ('00000000-0000-0000-0000-000000000003', 'bob', '2025-09-01', 60, 'p1', NULL, NULL, 'x');",
            )
            .unwrap();
        pool
    }

    #[test]
    fn rows_carry_names_and_percentages() {
        let mut pool = pool();
        let rows = load_rows(&mut pool, "alice", &DateRange::all()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.date, "2025-09-01");
        assert_eq!(first.project_name, "Apollo");
        assert_eq!(first.stage_name, "Design");
        assert_eq!(first.task_id, "");
        assert_eq!(first.percentage, 25.0);
        assert_eq!(first.hours, "02h 00m");

        assert_eq!(rows[1].percentage, 25.0);
    }

    #[test]
    fn range_limits_rows() {
        let mut pool = pool();
        let range = parse_range("2025-10").unwrap();
        let rows = load_rows(&mut pool, "alice", &range).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].target_minutes, 240);
    }

    #[test]
    fn relative_path_is_rejected() {
        let mut pool = pool();
        let err = ExportLogic::export(
            &mut pool,
            "alice",
            ExportFormat::Csv,
            "out.csv",
            &None,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }
}
