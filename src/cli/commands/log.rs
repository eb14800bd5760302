use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle `log --print`. A fresh database gets its schema first so the
/// table always exists.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print } = cmd else {
        return Ok(());
    };
    if !*print {
        return Ok(());
    }

    let mut pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    LogLogic::print_log(&mut pool)
}
