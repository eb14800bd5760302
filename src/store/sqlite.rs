use super::{RecordStore, StoredEntry};
use crate::db::initialize::init_db;
use crate::db::log::{AuditOp, ttlog};
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::allocation::AllocationEntry;
use crate::models::daily_target::DailyTarget;
use crate::models::date_range::DateRange;
use crate::models::reference::{Project, ProjectStatus, Stage, Task};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error};
use std::sync::{Arc, Mutex};

/// `RecordStore` over a single SQLite connection.
///
/// rusqlite is blocking, so each call runs on tokio's blocking pool while the
/// caller's task awaits it.
#[derive(Clone)]
pub struct SqliteStore {
    pub(crate) pool: Arc<Mutex<DbPool>>,
}

impl SqliteStore {
    /// Open the database file and apply pending migrations.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        debug!("event=store_open module=store status=ok path={}", path);
        Ok(Self::from_pool(pool))
    }

    pub fn in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            pool: Arc::new(Mutex::new(pool)),
        }
    }

    /// Append a line to the internal audit log.
    pub async fn audit(&self, op: AuditOp, target: &str, message: &str) -> AppResult<()> {
        let target = target.to_string();
        let message = message.to_string();
        self.run("audit", move |pool| ttlog(&pool.conn, op, &target, &message))
            .await
    }

    async fn run<F, T>(&self, op: &'static str, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut DbPool) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = pool
                .lock()
                .map_err(|_| AppError::Other("connection lock poisoned".into()))?;
            f(&mut *guard)
        })
        .await;

        let result = match joined {
            Ok(r) => r,
            Err(e) => Err(AppError::Other(format!("store task failed: {}", e))),
        };

        result.map_err(|e| {
            let e = e.into_store();
            error!("event=store_call module=store status=error op={} error={}", op, e);
            e
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get_daily_target(
        &self,
        user: &str,
        date: NaiveDate,
    ) -> AppResult<Option<DailyTarget>> {
        let user = user.to_string();
        self.run("get_daily_target", move |pool| {
            queries::get_daily_target(&pool.conn, &user, &date)
        })
        .await
    }

    async fn upsert_daily_target(
        &self,
        user: &str,
        date: NaiveDate,
        total_minutes: u32,
    ) -> AppResult<()> {
        let user = user.to_string();
        self.run("upsert_daily_target", move |pool| {
            queries::upsert_daily_target(&pool.conn, &user, &date, total_minutes)
        })
        .await
    }

    async fn list_entries(&self, user: &str, range: DateRange) -> AppResult<Vec<StoredEntry>> {
        let user = user.to_string();
        self.run("list_entries", move |pool| {
            queries::list_entries(&pool.conn, &user, &range)
        })
        .await
    }

    async fn delete_entries(&self, user: &str, date: NaiveDate) -> AppResult<usize> {
        let user = user.to_string();
        self.run("delete_entries", move |pool| {
            queries::delete_entries(&pool.conn, &user, &date)
        })
        .await
    }

    async fn insert_entries(
        &self,
        user: &str,
        date: NaiveDate,
        entries: &[AllocationEntry],
    ) -> AppResult<()> {
        let user = user.to_string();
        let entries = entries.to_vec();
        self.run("insert_entries", move |pool| {
            queries::insert_entries(&mut pool.conn, &user, &date, &entries)
        })
        .await
    }

    async fn list_projects(&self, status: ProjectStatus) -> AppResult<Vec<Project>> {
        self.run("list_projects", move |pool| {
            queries::list_projects(&pool.conn, status)
        })
        .await
    }

    async fn list_stages(&self, project_ref: &str) -> AppResult<Vec<Stage>> {
        let project_ref = project_ref.to_string();
        self.run("list_stages", move |pool| {
            queries::list_stages(&pool.conn, &project_ref)
        })
        .await
    }

    async fn list_tasks(&self, stage_ref: &str) -> AppResult<Vec<Task>> {
        let stage_ref = stage_ref.to_string();
        self.run("list_tasks", move |pool| {
            queries::list_tasks(&pool.conn, &stage_ref)
        })
        .await
    }
}
