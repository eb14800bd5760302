use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check whether a migration version has already been recorded in `log`.
fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run `sql` once, then mark `version` as applied.
fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> Result<bool> {
    if is_applied(conn, version)? {
        return Ok(false);
    }

    conn.execute_batch(sql)?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    success(format!("Migration applied: {} → {}", version, description));
    Ok(true)
}

const REFERENCE_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS projects (
        id      TEXT PRIMARY KEY,
        name    TEXT NOT NULL,
        status  TEXT NOT NULL DEFAULT 'open' CHECK(status IN ('open','closed'))
    );

    CREATE TABLE IF NOT EXISTS stages (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        project_id  TEXT NOT NULL REFERENCES projects(id)
    );

    CREATE TABLE IF NOT EXISTS tasks (
        id        TEXT PRIMARY KEY,
        name      TEXT NOT NULL,
        stage_id  TEXT NOT NULL REFERENCES stages(id)
    );

    CREATE INDEX IF NOT EXISTS idx_stages_project ON stages(project_id);
    CREATE INDEX IF NOT EXISTS idx_tasks_stage ON tasks(stage_id);
"#;

const DAILY_TARGETS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS daily_targets (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id        TEXT NOT NULL,
        date           TEXT NOT NULL,          -- YYYY-MM-DD
        total_minutes  INTEGER NOT NULL CHECK(total_minutes >= 0),
        updated_at     TEXT NOT NULL,          -- ISO 8601 timestamp
        UNIQUE(user_id, date)
    );
"#;

const ALLOCATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS allocations (
        id          TEXT PRIMARY KEY,          -- entry uuid
        user_id     TEXT NOT NULL,
        date        TEXT NOT NULL,             -- YYYY-MM-DD
        minutes     INTEGER NOT NULL CHECK(minutes >= 0),
        project_id  TEXT,
        stage_id    TEXT,
        task_id     TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_allocations_user_date ON allocations(user_id, date);
"#;

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    apply(
        conn,
        "20250901_0001_reference_tables",
        "created projects/stages/tasks tables",
        REFERENCE_TABLES,
    )?;
    apply(
        conn,
        "20250901_0002_daily_targets",
        "created daily_targets table",
        DAILY_TARGETS_TABLE,
    )?;
    apply(
        conn,
        "20250901_0003_allocations",
        "created allocations table",
        ALLOCATIONS_TABLE,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, 3);

        for table in ["projects", "stages", "tasks", "daily_targets", "allocations"] {
            let found: Option<String> = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |r| r.get(0),
                )
                .optional()
                .unwrap();
            assert!(found.is_some(), "missing table {}", table);
        }
    }
}
