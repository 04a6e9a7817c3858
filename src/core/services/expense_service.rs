use chrono::NaiveDate;

use crate::domain::{Expense, NewExpense};
use crate::errors::{ExpenseError, Result};
use crate::money::{normalize_currency, parse_amount};
use crate::recurrence::{parse_date, Recurrence};
use crate::storage::Database;

/// Raw `add` command input, validated and normalized here before anything
/// touches storage.
#[derive(Debug, Clone)]
pub struct AddExpenseInput {
    pub name: String,
    pub amount: String,
    pub currency: String,
    pub category: Option<String>,
    pub recurrence: String,
    pub start: Option<String>,
    pub next_due: Option<String>,
    pub notes: Option<String>,
}

pub struct ExpenseService;

impl ExpenseService {
    /// Validates the input and inserts a new expense, deriving the initial
    /// due date when no explicit override is given: one-off expenses fall due
    /// on their start date (if any); recurring ones on the start date or
    /// `today`.
    pub fn add_expense(db: &Database, input: AddExpenseInput, today: NaiveDate) -> Result<Expense> {
        let recurrence = Recurrence::parse(&input.recurrence)?;
        let amount_cents = parse_amount(&input.amount)?;
        let start_date = input.start.as_deref().map(parse_date).transpose()?;
        let next_override = input.next_due.as_deref().map(parse_date).transpose()?;

        let next_due_date = match next_override {
            Some(explicit) => Some(explicit),
            None if recurrence == Recurrence::None => start_date,
            None => Some(start_date.unwrap_or(today)),
        };

        let id = db.insert_expense(&NewExpense {
            name: input.name,
            amount_cents,
            currency: normalize_currency(&input.currency),
            category: input.category,
            recurrence,
            start_date,
            next_due_date,
            notes: input.notes,
        })?;
        tracing::info!(id, "added expense");
        db.expense_by_id(id)?
            .ok_or_else(|| ExpenseError::ExpenseNotFound(id.to_string()))
    }

    /// Resolves an expense reference: all-digits means id, anything else is a
    /// case-insensitive name match.
    pub fn resolve(db: &Database, reference: &str) -> Result<Expense> {
        let not_found = || ExpenseError::ExpenseNotFound(reference.to_string());
        let found = if !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit()) {
            let id: i64 = reference.parse().map_err(|_| not_found())?;
            db.expense_by_id(id)?
        } else {
            db.expense_by_name(reference)?
        };
        found.ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_db() -> (Database, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let db = Database::open(temp.path().join("expenses.db")).expect("open database");
        (db, temp)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(name: &str) -> AddExpenseInput {
        AddExpenseInput {
            name: name.into(),
            amount: "12.34".into(),
            currency: "usd".into(),
            category: None,
            recurrence: "monthly".into(),
            start: None,
            next_due: None,
            notes: None,
        }
    }

    #[test]
    fn add_defaults_due_date_to_start() {
        let (db, _guard) = scratch_db();
        let mut request = input("Rent");
        request.start = Some("2024-01-01".into());
        let expense = ExpenseService::add_expense(&db, request, date(2024, 3, 10)).unwrap();
        assert_eq!(expense.next_due_date, Some(date(2024, 1, 1)));
        assert_eq!(expense.currency, "USD");
        assert_eq!(expense.amount_cents, 1234);
    }

    #[test]
    fn add_defaults_due_date_to_today_without_start() {
        let (db, _guard) = scratch_db();
        let expense = ExpenseService::add_expense(&db, input("Gym"), date(2024, 3, 10)).unwrap();
        assert_eq!(expense.next_due_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn one_off_without_start_has_no_due_date() {
        let (db, _guard) = scratch_db();
        let mut request = input("Ticket");
        request.recurrence = "once".into();
        let expense = ExpenseService::add_expense(&db, request, date(2024, 3, 10)).unwrap();
        assert_eq!(expense.recurrence, Recurrence::None);
        assert_eq!(expense.next_due_date, None);
    }

    #[test]
    fn explicit_next_due_overrides_derivation() {
        let (db, _guard) = scratch_db();
        let mut request = input("Rent");
        request.start = Some("2024-01-01".into());
        request.next_due = Some("2024-06-01".into());
        let expense = ExpenseService::add_expense(&db, request, date(2024, 3, 10)).unwrap();
        assert_eq!(expense.next_due_date, Some(date(2024, 6, 1)));
    }

    #[test]
    fn add_fails_fast_on_bad_input() {
        let (db, _guard) = scratch_db();
        let mut bad_amount = input("X");
        bad_amount.amount = "1,2".into();
        assert!(matches!(
            ExpenseService::add_expense(&db, bad_amount, date(2024, 1, 1)),
            Err(ExpenseError::InvalidAmount(_))
        ));

        let mut bad_recurrence = input("X");
        bad_recurrence.recurrence = "fortnightly-ish".into();
        assert!(matches!(
            ExpenseService::add_expense(&db, bad_recurrence, date(2024, 1, 1)),
            Err(ExpenseError::UnsupportedRecurrence(_))
        ));
        // nothing was written
        assert!(db.list_expenses(true).unwrap().is_empty());
    }

    #[test]
    fn resolve_by_id_and_name() {
        let (db, _guard) = scratch_db();
        let expense = ExpenseService::add_expense(&db, input("Rent"), date(2024, 1, 1)).unwrap();
        assert_eq!(
            ExpenseService::resolve(&db, &expense.id.to_string()).unwrap().id,
            expense.id
        );
        assert_eq!(ExpenseService::resolve(&db, "rent").unwrap().id, expense.id);
        assert!(matches!(
            ExpenseService::resolve(&db, "water"),
            Err(ExpenseError::ExpenseNotFound(_))
        ));
    }
}
