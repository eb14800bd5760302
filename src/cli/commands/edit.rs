use super::open_store;
use super::show::print_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::refs::RefsLogic;
use crate::core::session::EditingSession;
use crate::db::log::AuditOp;
use crate::errors::{AppError, AppResult};
use crate::models::allocation::{AllocationEntry, EntryId, WorkRef};
use crate::store::SqliteStore;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_date;
use crate::utils::time::{DurationInput, parse_duration, parse_minutes};

/// Parse `project[/stage[/task]]=duration`.
pub(crate) fn parse_entry_spec(spec: &str) -> AppResult<(WorkRef, DurationInput)> {
    let Some((path, duration)) = spec.rsplit_once('=') else {
        return Err(AppError::Validation(format!(
            "invalid entry '{}': expected project[/stage[/task]]=duration",
            spec
        )));
    };

    let parts: Vec<&str> = path.split('/').map(str::trim).collect();
    if parts.len() > 3 || parts[0].is_empty() {
        return Err(AppError::Validation(format!(
            "invalid selection '{}': expected project[/stage[/task]]",
            path
        )));
    }

    let work = WorkRef::new(
        parts.first().copied(),
        parts.get(1).copied(),
        parts.get(2).copied(),
    )?;
    Ok((work, parse_duration(duration)?))
}

/// Match `raw` against the ids of the session, either in full or by prefix.
fn resolve_id(session: &EditingSession<'_>, raw: &str) -> AppResult<EntryId> {
    let needle = raw.trim().to_ascii_lowercase();
    if needle.len() >= 32 {
        return EntryId::parse(&needle);
    }

    let matches: Vec<EntryId> = session
        .committed()
        .iter()
        .chain(session.drafts())
        .map(|e| e.id)
        .filter(|id| id.to_string().starts_with(&needle) || id.short().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(AppError::Validation(format!("no entry with id '{}'", raw))),
        _ => Err(AppError::Validation(format!(
            "id prefix '{}' matches {} entries",
            raw,
            matches.len()
        ))),
    }
}

async fn build_entry(
    store: &SqliteStore,
    session: &EditingSession<'_>,
    spec: &str,
) -> AppResult<AllocationEntry> {
    let (work, duration) = parse_entry_spec(spec)?;
    RefsLogic::check_work(store, &work).await?;
    match duration {
        DurationInput::Minutes(m) => session.entry(work, m),
        DurationInput::Percent(p) => session.entry_from_percentage(work, p),
    }
}

async fn audit(store: &SqliteStore, op: AuditOp, target: &str, message: &str) {
    if let Err(e) = store.audit(op, target, message).await {
        warning(format!("Failed to write internal log: {}", e));
    }
}

/// Handle `edit <date> ...`: one editing session, applied step by step.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Edit {
        date,
        target,
        entries,
        drafts,
        duplicate,
        remove,
        commit,
        save,
    } = cmd
    else {
        return Ok(());
    };

    let date = parse_date(date)?;
    let store = open_store(cfg)?;
    let mut session = EditingSession::open(&store, &cfg.user, date).await?;

    if let Some(raw) = target {
        session.confirm_target(parse_minutes(raw)?)?;
    }

    for raw in remove {
        let id = resolve_id(&session, raw)?;
        let removed = session.remove(&id)?;
        info(format!("Removed {} ({})", removed.id.short(), removed.work));
    }

    if *duplicate {
        let report = session.duplicate_previous().await?;
        match report.source_date {
            Some(src) => info(format!("Staged {} draft(s) copied from {}", report.staged, src)),
            None => warning("No earlier day with allocations to duplicate."),
        }
    }

    for spec in entries {
        let entry = build_entry(&store, &session, spec).await?;
        session.add_entry(entry)?;
    }

    for spec in drafts {
        let draft = build_entry(&store, &session, spec).await?;
        session.add_draft(draft)?;
    }

    if *commit {
        let report = session.commit_drafts()?;
        info(format!("Committed {} draft(s)", report.committed));
        if report.discarded > 0 {
            warning(format!(
                "{} draft(s) without a project or duration were discarded",
                report.discarded
            ));
        }
    }

    if *save {
        match session.save().await {
            Ok(report) => {
                let message = format!(
                    "Saved {} entr{} for {} (replaced {})",
                    report.inserted,
                    if report.inserted == 1 { "y" } else { "ies" },
                    date,
                    report.replaced
                );
                audit(&store, AuditOp::Save, &date.to_string(), &message).await;
                success(message);
                if !session.drafts().is_empty() {
                    warning(format!(
                        "{} uncommitted draft(s) were not saved",
                        session.drafts().len()
                    ));
                }
            }
            Err(e) => {
                audit(&store, AuditOp::SaveFailed, &date.to_string(), &e.to_string()).await;
                return Err(e);
            }
        }
    } else {
        print_session(&session, cfg.separator());
        println!();
        info("Preview only, nothing was saved (add --save to persist).");
    }

    session.close();
    Ok(())
}
