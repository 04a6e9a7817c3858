use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::errors::Result;
use crate::storage::Database;

/// Per-invocation state handed to command handlers.
pub struct CliContext {
    db_path: PathBuf,
}

impl CliContext {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Opens the configured database, creating the file and schema on first
    /// use.
    pub fn database(&self) -> Result<Database> {
        Database::open(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
