use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Operations recorded in the internal `log` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOp {
    Init,
    Target,
    Save,
    SaveFailed,
}

impl AuditOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOp::Init => "init",
            AuditOp::Target => "target",
            AuditOp::Save => "save",
            AuditOp::SaveFailed => "save_failed",
        }
    }
}

/// Write an audit line into the internal `log` table.
pub fn ttlog(conn: &Connection, op: AuditOp, target: &str, message: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![
        Local::now().to_rfc3339(),
        op.as_str(),
        target,
        message
    ])?;

    Ok(())
}
