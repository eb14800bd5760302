use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use log::debug;
use rusqlite::Connection;

/// Bring the schema up to date. Safe to call on every start.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    debug!("event=db_init module=db status=ok");
    Ok(())
}
