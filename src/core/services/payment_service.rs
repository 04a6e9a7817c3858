use chrono::NaiveDate;

use crate::core::services::ExpenseService;
use crate::domain::{MonthlySummary, NewPayment, PaymentFilter};
use crate::errors::Result;
use crate::money::parse_amount;
use crate::recurrence::{compute_next_due_date, parse_date, Recurrence, YearMonth};
use crate::storage::Database;

/// Raw `pay` command input. Absent amount and date default to the expense's
/// standard amount and today.
#[derive(Debug, Clone, Default)]
pub struct PaymentInput {
    pub amount: Option<String>,
    pub date: Option<String>,
    pub method: Option<String>,
    pub notes: Option<String>,
}

/// What the pay workflow did, for the CLI to report.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment_id: i64,
    pub expense_name: String,
    pub next_due: Option<NaiveDate>,
    pub deactivated: bool,
}

pub struct PaymentService;

impl PaymentService {
    /// Records a payment against an expense and advances its schedule.
    ///
    /// One-off expenses reach their terminal state here: the due date is
    /// cleared and the expense deactivated. Recurring expenses get their next
    /// due date recomputed from the paid date and stay active. The payment
    /// insert and the expense update land in a single storage transaction.
    pub fn record_payment(
        db: &mut Database,
        reference: &str,
        input: PaymentInput,
        today: NaiveDate,
    ) -> Result<PaymentReceipt> {
        let expense = ExpenseService::resolve(db, reference)?;
        let amount_cents = match input.amount.as_deref() {
            Some(text) => parse_amount(text)?,
            None => expense.amount_cents,
        };
        let paid_date = match input.date.as_deref() {
            Some(text) => parse_date(text)?,
            None => today,
        };

        let (next_due, active) = if expense.recurrence == Recurrence::None {
            (None, false)
        } else {
            let next = compute_next_due_date(
                expense.next_due_date,
                expense.start_date,
                expense.recurrence,
                paid_date,
            );
            (next, true)
        };

        let payment_id = db.apply_payment(
            &NewPayment {
                expense_id: expense.id,
                amount_cents,
                paid_date,
                method: input.method,
                notes: input.notes,
            },
            next_due,
            active,
        )?;
        tracing::info!(
            payment_id,
            expense_id = expense.id,
            next_due = next_due.map(|d| d.to_string()),
            "recorded payment"
        );
        Ok(PaymentReceipt {
            payment_id,
            expense_name: expense.name,
            next_due,
            deactivated: !active,
        })
    }

    /// Resolves `payments` command filters: an explicit id wins, otherwise a
    /// name reference is looked up (and must exist).
    pub fn build_filter(
        db: &Database,
        expense_id: Option<i64>,
        name: Option<&str>,
        month: Option<YearMonth>,
    ) -> Result<PaymentFilter> {
        let expense_id = match (expense_id, name) {
            (Some(id), _) => Some(id),
            (None, Some(reference)) => Some(ExpenseService::resolve(db, reference)?.id),
            (None, None) => None,
        };
        Ok(PaymentFilter {
            expense_id,
            year_month: month,
        })
    }

    pub fn month_summary(db: &Database, month: YearMonth) -> Result<MonthlySummary> {
        db.monthly_summary(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::AddExpenseInput;
    use crate::errors::ExpenseError;
    use tempfile::TempDir;

    fn scratch_db() -> (Database, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let db = Database::open(temp.path().join("expenses.db")).expect("open database");
        (db, temp)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(db: &Database, name: &str, recurrence: &str, start: Option<&str>) -> i64 {
        ExpenseService::add_expense(
            db,
            AddExpenseInput {
                name: name.into(),
                amount: "1200.00".into(),
                currency: "USD".into(),
                category: None,
                recurrence: recurrence.into(),
                start: start.map(Into::into),
                next_due: None,
                notes: None,
            },
            date(2024, 1, 1),
        )
        .expect("add expense")
        .id
    }

    #[test]
    fn paying_a_monthly_expense_advances_the_due_date() {
        let (mut db, _guard) = scratch_db();
        let id = add(&db, "Rent", "monthly", Some("2024-01-01"));

        let receipt = PaymentService::record_payment(
            &mut db,
            "Rent",
            PaymentInput {
                date: Some("2024-01-05".into()),
                ..Default::default()
            },
            date(2024, 1, 5),
        )
        .unwrap();

        assert!(!receipt.deactivated);
        assert_eq!(receipt.next_due, Some(date(2024, 2, 1)));

        let expense = db.expense_by_id(id).unwrap().unwrap();
        assert!(expense.active);
        assert_eq!(expense.next_due_date, Some(date(2024, 2, 1)));

        let payments = db
            .list_payments(PaymentFilter {
                expense_id: Some(id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount_cents, 120000);
        assert_eq!(payments[0].paid_date, date(2024, 1, 5));
    }

    #[test]
    fn paying_a_one_off_deactivates_it() {
        let (mut db, _guard) = scratch_db();
        let id = add(&db, "Deposit", "none", Some("2024-01-01"));

        let receipt = PaymentService::record_payment(
            &mut db,
            &id.to_string(),
            PaymentInput::default(),
            date(2024, 1, 7),
        )
        .unwrap();

        assert!(receipt.deactivated);
        assert_eq!(receipt.next_due, None);
        let expense = db.expense_by_id(id).unwrap().unwrap();
        assert!(!expense.active);
        assert_eq!(expense.next_due_date, None);
    }

    #[test]
    fn override_amount_is_recorded() {
        let (mut db, _guard) = scratch_db();
        let id = add(&db, "Power", "monthly", Some("2024-01-01"));
        PaymentService::record_payment(
            &mut db,
            "power",
            PaymentInput {
                amount: Some("87.65".into()),
                date: Some("2024-01-03".into()),
                method: Some("debit".into()),
                ..Default::default()
            },
            date(2024, 1, 3),
        )
        .unwrap();
        let payments = db
            .list_payments(PaymentFilter {
                expense_id: Some(id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(payments[0].amount_cents, 8765);
        assert_eq!(payments[0].method.as_deref(), Some("debit"));
    }

    #[test]
    fn unknown_reference_fails_before_any_write() {
        let (mut db, _guard) = scratch_db();
        let result = PaymentService::record_payment(
            &mut db,
            "ghost",
            PaymentInput::default(),
            date(2024, 1, 1),
        );
        assert!(matches!(result, Err(ExpenseError::ExpenseNotFound(_))));
        assert!(db.list_payments(PaymentFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn filter_resolves_name_references() {
        let (mut db, _guard) = scratch_db();
        let id = add(&db, "Rent", "monthly", Some("2024-01-01"));
        PaymentService::record_payment(
            &mut db,
            "Rent",
            PaymentInput {
                date: Some("2024-01-05".into()),
                ..Default::default()
            },
            date(2024, 1, 5),
        )
        .unwrap();

        let filter = PaymentService::build_filter(&db, None, Some("RENT"), None).unwrap();
        assert_eq!(filter.expense_id, Some(id));
        assert!(matches!(
            PaymentService::build_filter(&db, None, Some("ghost"), None),
            Err(ExpenseError::ExpenseNotFound(_))
        ));
    }
}
