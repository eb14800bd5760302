//! Reference-data checks for project/stage/task selections.

use crate::errors::{AppError, AppResult};
use crate::models::allocation::WorkRef;
use crate::models::reference::ProjectStatus;
use crate::store::RecordStore;

pub struct RefsLogic;

impl RefsLogic {
    /// The project must be open, the stage must belong to the project and
    /// the task to the stage.
    pub async fn check_work(store: &dyn RecordStore, work: &WorkRef) -> AppResult<()> {
        let Some(project) = work.project_ref() else {
            return Err(AppError::Validation("a project is required".into()));
        };

        let open = store.list_projects(ProjectStatus::Open).await?;
        if !open.iter().any(|p| p.id == project) {
            return Err(AppError::Validation(format!(
                "project '{}' does not exist or is not open",
                project
            )));
        }

        let Some(stage) = work.stage_ref() else {
            return Ok(());
        };
        let stages = store.list_stages(project).await?;
        if !stages.iter().any(|s| s.id == stage) {
            return Err(AppError::Validation(format!(
                "stage '{}' does not belong to project '{}'",
                stage, project
            )));
        }

        let Some(task) = work.task_ref() else {
            return Ok(());
        };
        let tasks = store.list_tasks(stage).await?;
        if !tasks.iter().any(|t| t.id == task) {
            return Err(AppError::Validation(format!(
                "task '{}' does not belong to stage '{}'",
                task, stage
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn store() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        store
            .pool
            .lock()
            .unwrap()
            .conn
            .execute_batch(
                "INSERT INTO projects (id, name, status) VALUES
                    ('p1', 'Apollo', 'open'), ('p2', 'Old', 'closed');
                 INSERT INTO stages (id, name, project_id) VALUES ('s1', 'Design', 'p1');
                 INSERT INTO tasks (id, name, stage_id) VALUES ('t1', 'Mockups', 's1');",
            )
            .unwrap();
        store
    }

    #[tokio::test]
    async fn accepts_consistent_selection() {
        let store = store();
        let w = WorkRef::new(Some("p1"), Some("s1"), Some("t1")).unwrap();
        RefsLogic::check_work(&store, &w).await.unwrap();
        RefsLogic::check_work(&store, &WorkRef::project("p1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_closed_or_unknown_project() {
        let store = store();
        for p in ["p2", "nope"] {
            let err = RefsLogic::check_work(&store, &WorkRef::project(p))
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[tokio::test]
    async fn rejects_foreign_stage_and_task() {
        let store = store();
        let w = WorkRef::new(Some("p1"), Some("s9"), None).unwrap();
        assert!(RefsLogic::check_work(&store, &w).await.is_err());

        let w = WorkRef::new(Some("p1"), Some("s1"), Some("t9")).unwrap();
        assert!(RefsLogic::check_work(&store, &w).await.is_err());
    }
}
