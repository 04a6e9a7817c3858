//! Workflow layer tying the recurrence engine to storage. Handlers stay thin;
//! every state transition lives here.

pub mod expense_service;
pub mod payment_service;

pub use expense_service::{AddExpenseInput, ExpenseService};
pub use payment_service::{PaymentInput, PaymentReceipt, PaymentService};
