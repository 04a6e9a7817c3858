pub mod expense;
pub mod payment;

pub use expense::{Expense, NewExpense};
pub use payment::{MonthlySummary, NewPayment, Payment, PaymentFilter};
