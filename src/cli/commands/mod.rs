pub mod calendar;
pub mod config;
pub mod db;
pub mod edit;
pub mod export;
pub mod init;
pub mod log;
pub mod refs;
pub mod show;
pub mod target;

use crate::config::Config;
use crate::errors::AppResult;
use crate::store::SqliteStore;

/// Open the configured database, applying pending migrations.
pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    SqliteStore::open(&cfg.database)
}
