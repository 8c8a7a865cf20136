//! Receipt lifecycle error types.

use thiserror::Error;

/// Errors from the receipt lifecycle.
///
/// The first three variants are validation failures raised before any byte
/// is persisted; `Decode` is a transform failure after staging; the rest are
/// fatal storage/configuration failures.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Declared MIME type is not an accepted image type.
    #[error("Only JPG and PNG images are allowed")]
    InvalidMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// Declared or received size exceeds the bound.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Offending size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Declared size does not match the received byte count.
    #[error("declared size {declared} does not match received {actual} bytes")]
    SizeMismatch {
        /// Declared size in bytes.
        declared: u64,
        /// Received byte count.
        actual: u64,
    },

    /// The staged bytes could not be decoded or re-encoded as an image.
    #[error("failed to process image: {0}")]
    Decode(String),

    /// Storage root could not be initialized.
    #[error("receipt storage configuration error: {0}")]
    Configuration(String),

    /// File-system operation failed.
    #[error("receipt storage operation failed: {0}")]
    Storage(String),
}

impl ReceiptError {
    /// True for failures of the caller's input, mapped to HTTP 400.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidMimeType { .. } | Self::FileTooLarge { .. } | Self::SizeMismatch { .. }
        )
    }
}

impl From<opendal::Error> for ReceiptError {
    fn from(err: opendal::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(
            ReceiptError::InvalidMimeType {
                mime_type: "text/plain".into()
            }
            .is_validation()
        );
        assert!(
            ReceiptError::FileTooLarge {
                size: 11,
                max: 10
            }
            .is_validation()
        );
        assert!(!ReceiptError::Decode("bad magic".into()).is_validation());
        assert!(!ReceiptError::Storage("io".into()).is_validation());
    }
}
