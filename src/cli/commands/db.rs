use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use log::info as log_info;

/// Handle `db --migrate | --check | --vacuum | --info`, in that order.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *vacuum || *show_info) {
        warning("Nothing to do: pass --migrate, --check, --vacuum or --info.");
        return Ok(());
    }

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        info("Running migrations…");
        run_pending_migrations(&pool.conn)?;
        success("Migrations completed.");
    }

    if *check {
        info("Running integrity check…");
        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
        log_info!("event=db_check module=db result={}", integrity);

        if integrity == "ok" {
            success("Integrity check passed.");
        } else {
            warning(format!("Integrity check failed: {}", integrity));
        }
    }

    if *vacuum {
        info("Running VACUUM…");
        pool.conn.execute_batch("VACUUM;")?;
        log_info!("event=db_vacuum module=db status=ok");
        success("Vacuum completed.");
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    Ok(())
}
