//! Expense/income domain types and validation.

pub mod types;
pub mod validation;

pub use types::{Expense, Income, NewExpense, NewIncome};
pub use validation::{LedgerValidationError, compute_total, validate_expense, validate_income};
