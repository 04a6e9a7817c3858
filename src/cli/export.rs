//! CSV export of the two tables. Headers are written explicitly so they match
//! the stored field names even for empty tables.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::storage::Database;

const EXPENSE_FIELDS: [&str; 12] = [
    "id",
    "name",
    "amount_cents",
    "currency",
    "category",
    "recurrence",
    "start_date",
    "next_due_date",
    "notes",
    "active",
    "created_at",
    "updated_at",
];
const PAYMENT_FIELDS: [&str; 7] = [
    "id",
    "expense_id",
    "amount_cents",
    "paid_date",
    "method",
    "notes",
    "created_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Expenses,
    Payments,
    All,
}

impl ExportTable {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "expenses" => Some(ExportTable::Expenses),
            "payments" => Some(ExportTable::Payments),
            "all" => Some(ExportTable::All),
            _ => None,
        }
    }
}

/// Writes the selected table(s) as CSV and returns `(label, path)` per file
/// written. `All` derives `<stem>_expenses.csv` / `<stem>_payments.csv` from
/// the output path.
pub fn export_tables(
    db: &Database,
    output: &Path,
    table: ExportTable,
) -> Result<Vec<(&'static str, PathBuf)>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut written = Vec::new();
    if matches!(table, ExportTable::Expenses | ExportTable::All) {
        let path = match table {
            ExportTable::All => sibling(output, "expenses"),
            _ => output.to_path_buf(),
        };
        write_expenses(db, &path)?;
        written.push(("expenses", path));
    }
    if matches!(table, ExportTable::Payments | ExportTable::All) {
        let path = match table {
            ExportTable::All => sibling(output, "payments"),
            _ => output.to_path_buf(),
        };
        write_payments(db, &path)?;
        written.push(("payments", path));
    }
    Ok(written)
}

fn sibling(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("export");
    output.with_file_name(format!("{stem}_{suffix}.csv"))
}

fn write_expenses(db: &Database, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(EXPENSE_FIELDS)?;
    for expense in db.list_expenses(true)? {
        writer.serialize(&expense)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_payments(db: &Database, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(PAYMENT_FIELDS)?;
    for payment in db.list_payments(Default::default())? {
        writer.serialize(&payment)?;
    }
    writer.flush()?;
    Ok(())
}
