//! Receipt store configuration.

use std::path::{Path, PathBuf};

/// Accepted upload MIME types. `image/jpg` is a common client alias for
/// `image/jpeg`.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Receipt store configuration.
#[derive(Debug, Clone)]
pub struct ReceiptStoreConfig {
    /// Staging root for in-flight uploads. Never web-addressable.
    pub staging_root: PathBuf,
    /// Durable root for promoted receipts.
    pub durable_root: PathBuf,
    /// Path prefix stored in the database and used by clients to fetch the
    /// file; the durable root is served read-only under it.
    pub public_prefix: String,
    /// Maximum upload size in bytes.
    pub max_file_size: u64,
}

impl ReceiptStoreConfig {
    /// Default max upload size: 10 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Creates a config with default bounds.
    #[must_use]
    pub fn new(staging_root: impl Into<PathBuf>, durable_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            durable_root: durable_root.into(),
            public_prefix: "uploads/receipts".to_string(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Overrides the maximum upload size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Overrides the public prefix.
    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    /// The durable root path (for read-only static serving).
    #[must_use]
    pub fn durable_root(&self) -> &Path {
        &self.durable_root
    }

    /// Check if a MIME type is accepted.
    #[must_use]
    pub fn is_mime_type_allowed(mime_type: &str) -> bool {
        ALLOWED_MIME_TYPES.contains(&mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReceiptStoreConfig::new("uploads/temp", "uploads/receipts");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.public_prefix, "uploads/receipts");
    }

    #[test]
    fn test_mime_type_allowlist() {
        assert!(ReceiptStoreConfig::is_mime_type_allowed("image/jpeg"));
        assert!(ReceiptStoreConfig::is_mime_type_allowed("image/jpg"));
        assert!(ReceiptStoreConfig::is_mime_type_allowed("image/png"));
        assert!(!ReceiptStoreConfig::is_mime_type_allowed("image/gif"));
        assert!(!ReceiptStoreConfig::is_mime_type_allowed("text/plain"));
        assert!(!ReceiptStoreConfig::is_mime_type_allowed("application/pdf"));
    }
}
