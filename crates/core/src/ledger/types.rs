//! Ledger domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::receipt::ReceiptHandle;

/// An expense row.
///
/// `total` is always `round(quantity * unit_price, 2)`, recomputed
/// server-side on every write; a client-supplied total is never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Product or service bought.
    pub product_name: String,
    /// Quantity bought, strictly positive.
    pub quantity: Decimal,
    /// Price per unit, strictly positive.
    pub unit_price: Decimal,
    /// Computed line total.
    pub total: Decimal,
    /// Durable receipt image, at most one per expense.
    pub receipt: Option<ReceiptHandle>,
    /// Business date of the expense.
    pub expense_date: NaiveDate,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An income row. No attachment dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Where the money came from.
    pub source: String,
    /// Amount received, strictly positive.
    pub amount: Decimal,
    /// Business date of the income.
    pub income_date: NaiveDate,
    /// Free-form note.
    pub description: Option<String>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating or updating an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Product or service bought.
    pub product_name: String,
    /// Quantity bought.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Business date.
    pub expense_date: NaiveDate,
}

/// Caller-supplied fields for creating or updating an income.
#[derive(Debug, Clone)]
pub struct NewIncome {
    /// Where the money came from.
    pub source: String,
    /// Amount received.
    pub amount: Decimal,
    /// Business date.
    pub income_date: NaiveDate,
    /// Free-form note.
    pub description: Option<String>,
}
