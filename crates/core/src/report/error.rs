//! Report error types.

use thiserror::Error;

/// Errors from report parameter parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The period keyword is not one of `day`, `month`, `year`.
    #[error("period must be one of day, month, year")]
    InvalidPeriod(String),

    /// The reference date does not match the period's expected format.
    #[error("invalid date '{date}' for period {period}")]
    InvalidDate {
        /// The rejected date string.
        date: String,
        /// The period it was parsed against.
        period: &'static str,
    },
}
