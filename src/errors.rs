//! Unified application error type.
//! All modules (db, store, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::core::persist::SaveStep;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Allocation engine
    // ---------------------------
    #[error(
        "Over capacity: adding {requested} min would allocate {} of {target} min",
        .allocated + .requested
    )]
    OverCapacity {
        requested: u64,
        allocated: u64,
        target: u64,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{}", store_message(.step, .message))]
    StoreUnavailable {
        step: Option<SaveStep>,
        message: String,
    },

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

fn store_message(step: &Option<SaveStep>, message: &str) -> String {
    match step {
        Some(s) => format!("Record store unavailable during {}: {}", s, message),
        None => format!("Record store unavailable: {}", message),
    }
}

impl AppError {
    /// Wrap any store-side failure as `StoreUnavailable`, keeping the
    /// original message verbatim. Domain errors pass through untouched.
    pub fn into_store(self) -> AppError {
        match self {
            AppError::Db(e) => AppError::StoreUnavailable {
                step: None,
                message: e.to_string(),
            },
            AppError::Io(e) => AppError::StoreUnavailable {
                step: None,
                message: e.to_string(),
            },
            AppError::Migration(m) | AppError::Other(m) => {
                AppError::StoreUnavailable { step: None, message: m }
            }
            other => other,
        }
    }

    /// Tag a `StoreUnavailable` error with the save step that produced it.
    pub fn at_step(self, step: SaveStep) -> AppError {
        match self.into_store() {
            AppError::StoreUnavailable { message, .. } => AppError::StoreUnavailable {
                step: Some(step),
                message,
            },
            other => other,
        }
    }

    pub fn is_over_capacity(&self) -> bool {
        matches!(self, AppError::OverCapacity { .. })
    }

    /// Rejected input: domain validation or a malformed duration.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::InvalidDuration(_))
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
