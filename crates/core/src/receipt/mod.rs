//! Receipt-image lifecycle.
//!
//! Turns an untrusted uploaded byte stream into a durable, size- and
//! format-bounded image file. Every durable file is created and destroyed
//! here and nowhere else, so the invariant "at most one live owner per file"
//! has a single enforcement point.

pub mod config;
pub mod error;
pub mod service;
pub mod types;

pub use config::ReceiptStoreConfig;
pub use error::ReceiptError;
pub use service::ReceiptStore;
pub use types::{ReceiptHandle, ReceiptUpload, TempHandle, TransformedHandle};
