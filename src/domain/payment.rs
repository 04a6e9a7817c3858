use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::recurrence::YearMonth;

/// A recorded payment against an expense. Immutable once inserted.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub expense_id: i64,
    pub amount_cents: i64,
    pub paid_date: NaiveDate,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub expense_id: i64,
    pub amount_cents: i64,
    pub paid_date: NaiveDate,
    pub method: Option<String>,
    pub notes: Option<String>,
}

/// Optional constraints for payment listings; all absent lists everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFilter {
    pub expense_id: Option<i64>,
    pub year_month: Option<YearMonth>,
}

/// Aggregate over one calendar month of payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySummary {
    pub total_cents: i64,
    pub count: i64,
}
