use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH: usize = 60;

/// One row of the internal `log` table.
#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// Colour of an operation in `log --print`.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "target" => Colour::Cyan,
        "save" => Colour::Green,
        "save_failed" => Colour::Red,
        "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn load(pool: &mut DbPool) -> AppResult<Vec<LogRow>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogRow {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// `op (target)` coloured on the op word, cut to `OP_WIDTH` visible chars.
    fn render_operation(re: &Regex, row: &LogRow) -> String {
        let color = color_for_operation(&row.operation);
        let plain = if row.target.is_empty() {
            row.operation.clone()
        } else {
            format!("{} ({})", row.operation, row.target)
        };

        let visible = strip_ansi(re, &plain);
        let truncated = if visible.chars().count() > OP_WIDTH {
            let mut s: String = visible.chars().take(OP_WIDTH - 3).collect();
            s.push_str("...");
            s
        } else {
            visible
        };

        match truncated.split_once(' ') {
            Some((op, rest)) => format!("{} {}", color.paint(op), rest),
            None => color.paint(truncated.as_str()).to_string(),
        }
    }

    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let re = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| AppError::Other(format!("invalid pattern: {e}")))?;
        let entries = Self::load(pool)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|r| r.date.len()).max().unwrap_or(10);
        let rendered: Vec<String> = entries
            .iter()
            .map(|r| Self::render_operation(&re, r))
            .collect();
        let op_w = rendered
            .iter()
            .map(|s| strip_ansi(&re, s).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH);

        println!("📜 Internal log:\n");

        for (row, op) in entries.iter().zip(rendered) {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&re, &op).chars().count()));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                row.id,
                row.date,
                op,
                padding,
                row.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
