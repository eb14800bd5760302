use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::reference::ProjectStatus;
use crate::store::RecordStore;
use crate::ui::messages::warning;
use crate::utils::table::{Column, Table};

fn print_rows(title: &str, rows: Vec<(String, String)>, separator: char) {
    if rows.is_empty() {
        warning(format!("No {} found.", title));
        return;
    }
    let mut table = Table::new(vec![Column::left("ID", 12), Column::left("NAME", 30)], separator);
    for (id, name) in rows {
        table.add_row(vec![id, name]);
    }
    println!("{}:", title);
    print!("{}", table.render());
}

/// Handle `refs [--project ID | --stage ID]`.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Refs { project, stage } = cmd {
        let store = open_store(cfg)?;
        let sep = cfg.separator();

        if let Some(stage) = stage {
            let tasks = store.list_tasks(stage).await?;
            print_rows(
                &format!("tasks of stage {}", stage),
                tasks.into_iter().map(|t| (t.id, t.name)).collect(),
                sep,
            );
        } else if let Some(project) = project {
            let stages = store.list_stages(project).await?;
            print_rows(
                &format!("stages of project {}", project),
                stages.into_iter().map(|s| (s.id, s.name)).collect(),
                sep,
            );
        } else {
            let projects = store.list_projects(ProjectStatus::Open).await?;
            print_rows(
                "open projects",
                projects.into_iter().map(|p| (p.id, p.name)).collect(),
                sep,
            );
        }
    }
    Ok(())
}
