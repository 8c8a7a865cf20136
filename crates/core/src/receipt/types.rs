//! Receipt lifecycle handle types.
//!
//! Each handle marks one state of an upload attempt: `TempHandle` after the
//! raw bytes land in staging, `TransformedHandle` after normalization, and
//! `ReceiptHandle` once the file is durable. Only `ReceiptHandle` ever leaves
//! this module's service.

use serde::{Deserialize, Serialize};

/// An uploaded byte stream with its declared metadata, not yet trusted.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    /// Raw uploaded bytes.
    pub bytes: Vec<u8>,
    /// Declared MIME type.
    pub content_type: String,
    /// Declared size in bytes.
    pub declared_size: u64,
}

impl ReceiptUpload {
    /// Builds an upload whose declared size is the received byte count.
    #[must_use]
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        let declared_size = bytes.len() as u64;
        Self {
            bytes,
            content_type: content_type.into(),
            declared_size,
        }
    }
}

/// A raw upload persisted to the staging area.
#[derive(Debug)]
pub struct TempHandle {
    pub(crate) key: String,
}

impl TempHandle {
    /// Staging key of the raw file.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// A normalized image persisted to the staging area.
#[derive(Debug)]
pub struct TransformedHandle {
    pub(crate) key: String,
}

impl TransformedHandle {
    /// Staging key of the normalized file.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Locator of a durably-stored receipt image.
///
/// The inner path is what the database persists and what clients fetch; it
/// always points under the public durable prefix. Exclusively owned by one
/// expense row for the row's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptHandle {
    storage_path: String,
}

impl ReceiptHandle {
    /// Wraps a stored path. Used by the persistence layer when rehydrating
    /// rows; new paths are only minted by the receipt store.
    #[must_use]
    pub fn from_stored(storage_path: impl Into<String>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// The stored path, relative to the service root.
    #[must_use]
    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    /// The file name inside the durable area.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.storage_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.storage_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_declares_byte_count() {
        let upload = ReceiptUpload::new(vec![0u8; 42], "image/png");
        assert_eq!(upload.declared_size, 42);
        assert_eq!(upload.content_type, "image/png");
    }

    #[test]
    fn test_handle_file_name() {
        let handle = ReceiptHandle::from_stored("uploads/receipts/receipt-abc.jpg");
        assert_eq!(handle.file_name(), "receipt-abc.jpg");
        assert_eq!(handle.storage_path(), "uploads/receipts/receipt-abc.jpg");
    }

    #[test]
    fn test_handle_file_name_without_prefix() {
        let handle = ReceiptHandle::from_stored("receipt-abc.jpg");
        assert_eq!(handle.file_name(), "receipt-abc.jpg");
    }
}
