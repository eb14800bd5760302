use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::EditingSession;
use crate::db::log::AuditOp;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::date::parse_date;
use crate::utils::mins2readable;
use crate::utils::time::parse_minutes;

/// Handle `target <date> [duration]`: confirm the day's target and save it.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Target { date, duration } = cmd {
        let date = parse_date(date)?;
        let raw = duration.as_deref().unwrap_or(&cfg.default_target);
        let minutes = parse_minutes(raw)?;

        let store = open_store(cfg)?;
        let mut session = EditingSession::open(&store, &cfg.user, date).await?;
        session.confirm_target(minutes)?;
        session.save_target().await?;

        let message = format!(
            "Target for {} set to {}",
            date,
            mins2readable(minutes as i64, false, false)
        );
        if let Err(e) = store
            .audit(AuditOp::Target, &date.to_string(), &message)
            .await
        {
            warning(format!("Failed to write internal log: {}", e));
        }
        success(message);
        session.close();
    }
    Ok(())
}
