//! End-to-end store behavior: add expenses, record payments, and read the
//! results back from a real on-disk database.

use billbook::core::services::{AddExpenseInput, ExpenseService, PaymentInput, PaymentService};
use billbook::domain::PaymentFilter;
use billbook::errors::ExpenseError;
use billbook::recurrence::{parse_year_month, YearMonth};
use billbook::storage::Database;
use chrono::NaiveDate;
use tempfile::TempDir;

fn scratch_db() -> (Database, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let db = Database::open(temp.path().join("expenses.db")).expect("open database");
    (db, temp)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_expense(
    db: &Database,
    name: &str,
    amount: &str,
    recurrence: &str,
    start: Option<&str>,
) -> i64 {
    let input = AddExpenseInput {
        name: name.into(),
        amount: amount.into(),
        currency: "USD".into(),
        category: None,
        recurrence: recurrence.into(),
        start: start.map(Into::into),
        next_due: None,
        notes: None,
    };
    ExpenseService::add_expense(db, input, date(2024, 1, 1))
        .expect("add expense")
        .id
}

#[test]
fn monthly_rent_lifecycle() {
    let (mut db, _guard) = scratch_db();
    let id = add_expense(&db, "Rent", "1200.00", "monthly", Some("2024-01-01"));

    let rent = db.expense_by_id(id).unwrap().expect("rent exists");
    assert_eq!(rent.amount_cents, 120_000);
    assert_eq!(rent.next_due_date, Some(date(2024, 1, 1)));

    let receipt = PaymentService::record_payment(
        &mut db,
        "Rent",
        PaymentInput {
            date: Some("2024-01-05".into()),
            ..Default::default()
        },
        date(2024, 1, 5),
    )
    .expect("record payment");
    assert_eq!(receipt.next_due, Some(date(2024, 2, 1)));
    assert!(!receipt.deactivated);

    let rent = db.expense_by_id(id).unwrap().expect("rent exists");
    assert_eq!(rent.next_due_date, Some(date(2024, 2, 1)));
    assert!(rent.active);

    let payments = db
        .list_payments(PaymentFilter {
            expense_id: Some(id),
            year_month: None,
        })
        .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 120_000);
    assert_eq!(payments[0].paid_date, date(2024, 1, 5));
}

#[test]
fn one_off_is_deactivated_after_payment() {
    let (mut db, _guard) = scratch_db();
    let id = add_expense(&db, "Concert", "89.99", "once", Some("2024-03-01"));

    let receipt = PaymentService::record_payment(
        &mut db,
        &id.to_string(),
        PaymentInput::default(),
        date(2024, 3, 1),
    )
    .expect("record payment");
    assert!(receipt.deactivated);
    assert_eq!(receipt.next_due, None);

    let concert = db.expense_by_id(id).unwrap().expect("concert exists");
    assert!(!concert.active);
    assert_eq!(concert.next_due_date, None);

    // gone from the default listing, back with include_inactive
    assert!(db.list_expenses(false).unwrap().is_empty());
    assert_eq!(db.list_expenses(true).unwrap().len(), 1);
}

#[test]
fn listing_orders_by_due_date_with_undated_last() {
    let (db, _guard) = scratch_db();
    add_expense(&db, "Later", "1.00", "monthly", Some("2024-06-01"));
    add_expense(&db, "Soon", "1.00", "monthly", Some("2024-02-01"));
    add_expense(&db, "Undated", "1.00", "once", None);

    let names: Vec<String> = db
        .list_expenses(false)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["Soon", "Later", "Undated"]);
}

#[test]
fn upcoming_respects_the_cutoff() {
    let (db, _guard) = scratch_db();
    add_expense(&db, "Inside", "5.00", "monthly", Some("2024-01-20"));
    add_expense(&db, "Outside", "5.00", "monthly", Some("2024-03-20"));

    let due = db.upcoming_expenses(date(2024, 1, 31)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].name, "Inside");
}

#[test]
fn monthly_summary_counts_only_the_requested_month() {
    let (mut db, _guard) = scratch_db();
    let id = add_expense(&db, "Gym", "30.00", "monthly", Some("2024-01-10"));

    for paid in ["2024-01-10", "2024-01-25", "2024-02-10"] {
        PaymentService::record_payment(
            &mut db,
            &id.to_string(),
            PaymentInput {
                date: Some(paid.into()),
                ..Default::default()
            },
            date(2024, 3, 1),
        )
        .expect("record payment");
    }

    let january = db.monthly_summary(parse_year_month("2024-01").unwrap()).unwrap();
    assert_eq!(january.total_cents, 6_000);
    assert_eq!(january.count, 2);

    let march = db
        .monthly_summary(YearMonth { year: 2024, month: 3 })
        .unwrap();
    assert_eq!(march.total_cents, 0);
    assert_eq!(march.count, 0);
}

#[test]
fn paying_an_unknown_expense_writes_nothing() {
    let (mut db, _guard) = scratch_db();
    let err = PaymentService::record_payment(
        &mut db,
        "Nope",
        PaymentInput::default(),
        date(2024, 1, 1),
    )
    .unwrap_err();
    assert!(matches!(err, ExpenseError::ExpenseNotFound(_)));
    assert!(db.list_payments(PaymentFilter::default()).unwrap().is_empty());
}

#[test]
fn reopening_the_database_preserves_data() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("expenses.db");
    {
        let db = Database::open(&path).expect("open database");
        add_expense(&db, "Hosting", "12.00", "yearly", Some("2024-01-01"));
    }
    let db = Database::open(&path).expect("reopen database");
    let expenses = db.list_expenses(true).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].name, "Hosting");
}
