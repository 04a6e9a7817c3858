use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the recurrence engine, services, and storage layers.
#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("Unsupported recurrence: {0}. Supported: biweekly, daily, monthly, none, quarterly, weekly, yearly")]
    UnsupportedRecurrence(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Invalid month `{0}` (expected YYYY-MM)")]
    InvalidMonth(String),
    #[error("Invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = StdResult<T, ExpenseError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`. Run `billbook help` for the command list.")]
    UnknownCommand(String),
}
