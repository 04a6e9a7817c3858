use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::money::display_amount;
use crate::recurrence::Recurrence;

/// A tracked bill or subscription. Field order matches the `expenses` table
/// and the CSV export layout.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub category: Option<String>,
    pub recurrence: Recurrence,
    pub start_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn amount_display(&self) -> String {
        display_amount(&self.currency, self.amount_cents)
    }
}

/// Fields required to insert an expense. New expenses are always active;
/// `active` only flips through the payment-recording workflow.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub category: Option<String>,
    pub recurrence: Recurrence,
    pub start_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}
