use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::EditingSession;
use crate::errors::AppResult;
use crate::models::allocation::AllocationEntry;
use crate::ui::messages::{field, header, warning};
use crate::utils::colors::{RESET, color_for_remaining, colorize_optional};
use crate::utils::date::parse_date;
use crate::utils::formatting::format_percentage;
use crate::utils::mins2readable;
use crate::utils::table::{Column, Table};

fn entries_table(entries: &[AllocationEntry], separator: char) -> String {
    let mut table = Table::new(
        vec![
            Column::left("ID", 8),
            Column::left("PROJECT/STAGE/TASK", 30),
            Column::right("DURATION", 8),
            Column::right("SHARE", 7),
        ],
        separator,
    );
    for e in entries {
        table.add_row(vec![
            e.id.short(),
            e.work.to_string(),
            e.duration().to_string(),
            format_percentage(e.percentage()),
        ]);
    }
    table.render()
}

/// Print target, committed entries, drafts and what is left to allocate.
pub(crate) fn print_session(session: &EditingSession<'_>, separator: char) {
    header(format!(
        "{} {} ({})",
        session.user(),
        session.date(),
        session.state().as_str()
    ));

    let target = session
        .target()
        .map(|t| t.duration().to_string())
        .unwrap_or_else(|| "--".to_string());
    field("Target", colorize_optional(&target));

    if session.committed().is_empty() {
        println!("\nNo committed entries.");
    } else {
        println!("\nEntries:");
        print!("{}", entries_table(session.committed(), separator));
    }

    if !session.drafts().is_empty() {
        println!("\nDrafts (not committed):");
        print!("{}", entries_table(session.drafts(), separator));
    }

    let remaining = session.remaining_minutes();
    println!();
    field(
        "Allocated",
        mins2readable(session.allocated_minutes() as i64, false, false),
    );
    field(
        "Remaining",
        format!(
            "{}{}{}",
            color_for_remaining(remaining),
            mins2readable(remaining, false, false),
            RESET
        ),
    );
}

/// Handle `show <date>`.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { date } = cmd {
        let date = parse_date(date)?;
        let store = open_store(cfg)?;
        let session = EditingSession::open(&store, &cfg.user, date).await?;

        if session.target().is_none() && session.committed().is_empty() {
            warning(format!("Nothing saved for {}.", date));
        } else {
            print_session(&session, cfg.separator());
        }
        session.close();
    }
    Ok(())
}
