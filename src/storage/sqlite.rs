//! SQLite persistence: two tables (`expenses`, `payments`) behind a thin
//! connection wrapper with named migrations.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{Expense, MonthlySummary, NewExpense, NewPayment, Payment, PaymentFilter};
use crate::errors::Result;
use crate::recurrence::{Recurrence, YearMonth};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_expenses",
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            currency TEXT NOT NULL,
            category TEXT,
            recurrence TEXT NOT NULL,
            start_date TEXT,
            next_due_date TEXT,
            notes TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_expenses_next_due ON expenses(next_due_date);",
    ),
    (
        "002_create_payments",
        "CREATE TABLE IF NOT EXISTS payments (
            id INTEGER PRIMARY KEY,
            expense_id INTEGER NOT NULL,
            amount_cents INTEGER NOT NULL,
            paid_date TEXT NOT NULL,
            method TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(expense_id) REFERENCES expenses(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_payments_expense ON payments(expense_id);
        CREATE INDEX IF NOT EXISTS idx_payments_paid_date ON payments(paid_date);",
    ),
];

const EXPENSE_COLUMNS: &str = "id, name, amount_cents, currency, category, recurrence, \
     start_date, next_due_date, notes, active, created_at, updated_at";
const PAYMENT_COLUMNS: &str =
    "id, expense_id, amount_cents, paid_date, method, notes, created_at";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if necessary) the database file and applies any
    /// pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Database { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )?;
        for (name, sql) in MIGRATIONS {
            let applied: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM schema_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            if applied.is_none() {
                let tx = self.conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, datetime('now'))",
                    params![name],
                )?;
                tx.commit()?;
                tracing::debug!(migration = name, "applied schema migration");
            }
        }
        Ok(())
    }

    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO expenses (
                name, amount_cents, currency, category, recurrence,
                start_date, next_due_date, notes, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                expense.name,
                expense.amount_cents,
                expense.currency,
                expense.category,
                expense.recurrence,
                expense.start_date,
                expense.next_due_date,
                expense.notes,
                true,
                now,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        Ok(stmt.query_row(params![id], map_expense).optional()?)
    }

    /// Case-insensitive name lookup; the lowest id wins on duplicates.
    pub fn expense_by_name(&self, name: &str) -> Result<Option<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE lower(name) = lower(?1) ORDER BY id LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        Ok(stmt.query_row(params![name], map_expense).optional()?)
    }

    /// All expenses, active first by default, sorted by due date then name.
    /// Expenses without a due date sort last.
    pub fn list_expenses(&self, include_inactive: bool) -> Result<Vec<Expense>> {
        let filter = if include_inactive { "" } else { " WHERE active = 1" };
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses{filter} \
             ORDER BY COALESCE(next_due_date, '9999-12-31'), name"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_expense)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Active expenses due on or before `until`.
    pub fn upcoming_expenses(&self, until: NaiveDate) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE active = 1 AND next_due_date IS NOT NULL AND next_due_date <= ?1 \
             ORDER BY next_due_date, name"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![until], map_expense)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Inserts a payment and updates its expense's due date and active flag
    /// in one transaction; a failure of either statement rolls back both.
    pub fn apply_payment(
        &mut self,
        payment: &NewPayment,
        next_due_date: Option<NaiveDate>,
        active: bool,
    ) -> Result<i64> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO payments (expense_id, amount_cents, paid_date, method, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                payment.expense_id,
                payment.amount_cents,
                payment.paid_date,
                payment.method,
                payment.notes,
                now,
            ],
        )?;
        let payment_id = tx.last_insert_rowid();
        tx.execute(
            "UPDATE expenses SET next_due_date = ?1, active = ?2, updated_at = ?3 WHERE id = ?4",
            params![next_due_date, active, now, payment.expense_id],
        )?;
        tx.commit()?;
        Ok(payment_id)
    }

    pub fn list_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(expense_id) = filter.expense_id {
            values.push(Box::new(expense_id));
            clauses.push(format!("expense_id = ?{}", values.len()));
        }
        if let Some(month) = filter.year_month {
            values.push(Box::new(month.to_string()));
            clauses.push(format!("substr(paid_date, 1, 7) = ?{}", values.len()));
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments{where_sql} ORDER BY paid_date DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), map_payment)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn monthly_summary(&self, month: YearMonth) -> Result<MonthlySummary> {
        let summary = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0), COUNT(*) FROM payments \
             WHERE substr(paid_date, 1, 7) = ?1",
            params![month.to_string()],
            |row| {
                Ok(MonthlySummary {
                    total_cents: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )?;
        Ok(summary)
    }
}

fn map_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount_cents: row.get(2)?,
        currency: row.get(3)?,
        category: row.get(4)?,
        recurrence: row.get(5)?,
        start_date: row.get(6)?,
        next_due_date: row.get(7)?,
        notes: row.get(8)?,
        active: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn map_payment(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        expense_id: row.get(1)?,
        amount_cents: row.get(2)?,
        paid_date: row.get(3)?,
        method: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl ToSql for Recurrence {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Recurrence {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|text| {
            Recurrence::parse(text).map_err(|err| FromSqlError::Other(Box::new(err)))
        })
    }
}
