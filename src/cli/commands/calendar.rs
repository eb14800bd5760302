use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calendar::CalendarAggregator;
use crate::core::summary::SummaryLogic;
use crate::errors::AppResult;
use crate::models::date_range::DateRange;
use crate::models::day_status::DayStatus;
use crate::ui::messages::field;
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date::{month_name, parse_month, today, weekday_column};
use crate::utils::formatting::bold;
use crate::utils::mins2readable;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

fn render_grid(statuses: &BTreeMap<NaiveDate, DayStatus>) -> String {
    let mut out = String::from(" Mo  Tu  We  Th  Fr  Sa  Su\n");
    let mut col = 0;

    if let Some(first) = statuses.keys().next() {
        col = weekday_column(*first);
        out.push_str(&"    ".repeat(col));
    }

    for (day, status) in statuses {
        out.push_str(&format!(
            "{}{:>3}{}{}",
            color_for_status(*status),
            day.day(),
            status.marker(),
            RESET
        ));
        col += 1;
        if col == 7 {
            out.push('\n');
            col = 0;
        }
    }
    if col != 0 {
        out.push('\n');
    }
    out
}

/// Handle `calendar [--month YYYY-MM]`.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Calendar { month } = cmd {
        let anchor = match month {
            Some(m) => parse_month(m)?,
            None => today(),
        };
        let range = DateRange::month_of(anchor);

        let store = open_store(cfg)?;
        let (statuses, summary) = tokio::try_join!(
            CalendarAggregator::statuses(&store, &cfg.user, range),
            SummaryLogic::summarize(&store, &cfg.user, range),
        )?;

        println!(
            "{}\n",
            bold(&format!("{} {}", month_name(anchor.month()), anchor.year()))
        );
        print!("{}", render_grid(&statuses));
        println!(
            "\n{} complete   {} partial   {} empty\n",
            DayStatus::Complete.marker(),
            DayStatus::Partial.marker(),
            DayStatus::Empty.marker()
        );

        field(
            "Logged",
            mins2readable(summary.total_minutes as i64, false, false),
        );
        field("Days worked", summary.days_worked);
        field("Complete", summary.complete_days);
        field("Partial", summary.partial_days);
        field(
            "Projects",
            format!(
                "{} allocated / {} open",
                summary.projects_allocated, summary.open_projects
            ),
        );
    }
    Ok(())
}
