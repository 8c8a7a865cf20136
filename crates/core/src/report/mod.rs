//! Period filtering and summary aggregation over ledger rows.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::ReportAggregator;
pub use types::{Period, PeriodRef, Summary};
