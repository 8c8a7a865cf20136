//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every read and single-row operation is parameterized by the caller's
//! [`recibo_core::access::Scope`].

pub mod expense;
pub mod income;
pub mod user;

pub use expense::{ExpenseError, ExpenseRepository};
pub use income::{IncomeError, IncomeRepository};
pub use user::UserRepository;
