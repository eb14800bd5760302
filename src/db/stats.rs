use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Row counts and date span of the allocation tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbStats {
    pub targets: i64,
    pub allocations: i64,
    pub users: i64,
    pub projects: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn collect(pool: &DbPool) -> rusqlite::Result<DbStats> {
    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(date) FROM daily_targets", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(date) FROM daily_targets", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(DbStats {
        targets: count(pool, "SELECT COUNT(*) FROM daily_targets")?,
        allocations: count(pool, "SELECT COUNT(*) FROM allocations")?,
        users: count(pool, "SELECT COUNT(DISTINCT user_id) FROM daily_targets")?,
        projects: count(pool, "SELECT COUNT(*) FROM projects")?,
        first_date,
        last_date,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let stats = collect(pool)?;
    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, stats.users, RESET);
    println!(
        "{}• Daily targets:{} {}{}{}",
        CYAN, RESET, GREEN, stats.targets, RESET
    );
    println!(
        "{}• Allocations:{} {}{}{}",
        CYAN, RESET, GREEN, stats.allocations, RESET
    );
    println!(
        "{}• Projects:{} {}{}{}",
        CYAN, RESET, GREEN, stats.projects, RESET
    );

    let placeholder = format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        stats.first_date.as_deref().unwrap_or(&placeholder)
    );
    println!(
        "    to:   {}",
        stats.last_date.as_deref().unwrap_or(&placeholder)
    );

    if stats.targets > 0 {
        let avg = stats.allocations as f64 / stats.targets as f64;
        println!("{}• Average allocations/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    #[test]
    fn collect_on_empty_database() {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let stats = collect(&pool).unwrap();
        assert_eq!(stats, DbStats::default());
    }
}
