//! Receipt store implementation over OpenDAL file-system operators.
//!
//! An upload attempt moves through `receive` (staging) → `transform`
//! (normalize) → `promote` (durable). A failed step removes every file the
//! attempt created before the error is returned, so an aborted attempt never
//! leaves partial artifacts, and the old durable file of a `replace` is only
//! removed once its successor exists.

use std::io::Cursor;

use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};
use opendal::{Operator, services};
use tracing::warn;
use uuid::Uuid;

use super::config::ReceiptStoreConfig;
use super::error::ReceiptError;
use super::types::{ReceiptHandle, ReceiptUpload, TempHandle, TransformedHandle};

/// Normalized images are capped at this width; narrower images are never
/// upscaled.
pub const MAX_WIDTH: u32 = 800;

/// JPEG re-encode quality.
pub const JPEG_QUALITY: u8 = 80;

/// Receipt store managing the binary-attachment lifecycle.
///
/// Holds one operator rooted at the staging area and one at the durable
/// area; nothing else writes to either namespace.
pub struct ReceiptStore {
    staging: Operator,
    durable: Operator,
    config: ReceiptStoreConfig,
}

impl ReceiptStore {
    /// Creates a receipt store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either storage root cannot be initialized.
    pub fn from_config(config: ReceiptStoreConfig) -> Result<Self, ReceiptError> {
        let staging = Self::fs_operator(&config.staging_root)?;
        let durable = Self::fs_operator(&config.durable_root)?;
        Ok(Self {
            staging,
            durable,
            config,
        })
    }

    fn fs_operator(root: &std::path::Path) -> Result<Operator, ReceiptError> {
        let builder = services::Fs::default().root(
            root.to_str()
                .ok_or_else(|| ReceiptError::Configuration("invalid path".to_string()))?,
        );

        Ok(Operator::new(builder)
            .map_err(|e| ReceiptError::Configuration(e.to_string()))?
            .finish())
    }

    /// The store's configuration.
    #[must_use]
    pub fn config(&self) -> &ReceiptStoreConfig {
        &self.config
    }

    /// Validates declared upload metadata.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a disallowed MIME type or an oversize
    /// declaration. Nothing has been written when this fails.
    pub fn validate(&self, content_type: &str, declared_size: u64) -> Result<(), ReceiptError> {
        if !ReceiptStoreConfig::is_mime_type_allowed(content_type) {
            return Err(ReceiptError::InvalidMimeType {
                mime_type: content_type.to_string(),
            });
        }
        if declared_size > self.config.max_file_size {
            return Err(ReceiptError::FileTooLarge {
                size: declared_size,
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Receives an untrusted upload into the staging area.
    ///
    /// Constraint violations reject before any byte is persisted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad declared metadata or a mismatched
    /// byte count, or a storage error if the staging write fails.
    pub async fn receive(&self, upload: ReceiptUpload) -> Result<TempHandle, ReceiptError> {
        self.validate(&upload.content_type, upload.declared_size)?;

        let actual = upload.bytes.len() as u64;
        if actual > self.config.max_file_size {
            return Err(ReceiptError::FileTooLarge {
                size: actual,
                max: self.config.max_file_size,
            });
        }
        if actual != upload.declared_size {
            return Err(ReceiptError::SizeMismatch {
                declared: upload.declared_size,
                actual,
            });
        }

        let ext = if upload.content_type == "image/png" {
            "png"
        } else {
            "jpg"
        };
        let key = format!("receipt-{}.{ext}", Uuid::new_v4());
        self.staging.write(&key, upload.bytes).await?;

        Ok(TempHandle { key })
    }

    /// Normalizes a staged upload: caps width at [`MAX_WIDTH`] preserving
    /// aspect ratio (never upscaling) and re-encodes as JPEG at
    /// [`JPEG_QUALITY`].
    ///
    /// The raw temp file is removed on success and on failure; a decode
    /// failure surfaces as [`ReceiptError::Decode`].
    ///
    /// # Errors
    ///
    /// Returns `Decode` when the bytes are not a readable image, or a
    /// storage error from the staging area.
    pub async fn transform(&self, temp: TempHandle) -> Result<TransformedHandle, ReceiptError> {
        let data = match self.staging.read(temp.key()).await {
            Ok(data) => data.to_vec(),
            Err(e) => {
                self.remove_staged(temp.key()).await;
                return Err(e.into());
            }
        };

        let encoded = match normalize_image(&data) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.remove_staged(temp.key()).await;
                return Err(e);
            }
        };

        let key = format!("receipt-{}.jpg", Uuid::new_v4());
        if let Err(e) = self.staging.write(&key, encoded).await {
            self.remove_staged(temp.key()).await;
            return Err(e.into());
        }

        self.remove_staged(temp.key()).await;
        Ok(TransformedHandle { key })
    }

    /// Promotes a normalized image into durable storage under a
    /// collision-resistant name.
    ///
    /// The staging intermediate is removed only after the durable write
    /// succeeded, never before.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the durable write fails; the staging
    /// intermediate is removed in that case too (the attempt is aborted).
    pub async fn promote(
        &self,
        transformed: TransformedHandle,
    ) -> Result<ReceiptHandle, ReceiptError> {
        let data = match self.staging.read(transformed.key()).await {
            Ok(data) => data.to_vec(),
            Err(e) => {
                self.remove_staged(transformed.key()).await;
                return Err(e.into());
            }
        };

        let file_name = format!("receipt-{}.jpg", Uuid::new_v4());
        if let Err(e) = self.durable.write(&file_name, data).await {
            self.remove_staged(transformed.key()).await;
            return Err(e.into());
        }

        self.remove_staged(transformed.key()).await;

        Ok(ReceiptHandle::from_stored(format!(
            "{}/{file_name}",
            self.config.public_prefix
        )))
    }

    /// Runs the full receive → transform → promote chain.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step; every file created by the attempt
    /// has been removed by the time the error is returned.
    pub async fn store(&self, upload: ReceiptUpload) -> Result<ReceiptHandle, ReceiptError> {
        let temp = self.receive(upload).await?;
        let transformed = self.transform(temp).await?;
        self.promote(transformed).await
    }

    /// Deletes a durable receipt file.
    ///
    /// Idempotent, and deliberately infallible from the caller's view:
    /// file-system inconsistency must never block the owning row's mutation.
    /// Failures are logged and swallowed.
    pub async fn discard(&self, handle: &ReceiptHandle) {
        if let Err(e) = self.durable.delete(handle.file_name()).await {
            warn!(
                path = %handle.storage_path(),
                error = %e,
                "failed to remove durable receipt file"
            );
        }
    }

    /// Replaces a receipt: stores the new upload first, and only discards
    /// the old file once the new durable file exists. A failure mid-upload
    /// therefore never destroys a still-valid existing receipt.
    ///
    /// # Errors
    ///
    /// Propagates failures of the new upload's chain; the old handle is
    /// untouched in that case.
    pub async fn replace(
        &self,
        old: Option<&ReceiptHandle>,
        upload: ReceiptUpload,
    ) -> Result<ReceiptHandle, ReceiptError> {
        let new_handle = self.store(upload).await?;

        if let Some(old) = old {
            self.discard(old).await;
        }

        Ok(new_handle)
    }

    /// Best-effort removal of a staging file. Staging leftovers are not
    /// reachable by anything, so a failed delete only warrants a warning.
    async fn remove_staged(&self, key: &str) {
        if let Err(e) = self.staging.delete(key).await {
            warn!(key = %key, error = %e, "failed to remove staged receipt file");
        }
    }
}

/// Decodes, width-caps, and re-encodes an image as JPEG.
fn normalize_image(data: &[u8]) -> Result<Vec<u8>, ReceiptError> {
    let decoded =
        image::load_from_memory(data).map_err(|e| ReceiptError::Decode(e.to_string()))?;

    let resized = if decoded.width() > MAX_WIDTH {
        decoded.resize(MAX_WIDTH, u32::MAX, FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut encoded = Vec::new();
    let mut cursor = Cursor::new(&mut encoded);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ReceiptError::Decode(e.to_string()))?;

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::path::Path;

    fn test_store(max_file_size: u64) -> (ReceiptStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let staging = dir.path().join("temp");
        let durable = dir.path().join("receipts");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::create_dir_all(&durable).unwrap();

        let config =
            ReceiptStoreConfig::new(&staging, &durable).with_max_file_size(max_file_size);
        let store = ReceiptStore::from_config(config).expect("store");
        (store, dir)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn decode_durable(dir: &tempfile::TempDir, handle: &ReceiptHandle) -> DynamicImage {
        let path = dir.path().join("receipts").join(handle.file_name());
        let bytes = std::fs::read(path).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_store_creates_durable_jpeg() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let handle = store
            .store(ReceiptUpload::new(png_bytes(400, 300), "image/png"))
            .await
            .unwrap();

        assert!(handle.storage_path().starts_with("uploads/receipts/"));
        assert!(handle.file_name().ends_with(".jpg"));
        assert_eq!(file_count(&dir.path().join("receipts")), 1);
        // Staging intermediates are gone after promotion.
        assert_eq!(file_count(&dir.path().join("temp")), 0);
    }

    #[tokio::test]
    async fn test_wide_image_capped_at_max_width() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let handle = store
            .store(ReceiptUpload::new(png_bytes(1600, 400), "image/png"))
            .await
            .unwrap();

        let normalized = decode_durable(&dir, &handle);
        assert_eq!(normalized.width(), MAX_WIDTH);
        assert_eq!(normalized.height(), 200);
    }

    #[tokio::test]
    async fn test_narrow_image_not_upscaled() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let handle = store
            .store(ReceiptUpload::new(png_bytes(200, 100), "image/png"))
            .await
            .unwrap();

        let normalized = decode_durable(&dir, &handle);
        assert_eq!(normalized.width(), 200);
        assert_eq!(normalized.height(), 100);
    }

    #[tokio::test]
    async fn test_disallowed_mime_type_rejected_before_write() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let result = store
            .store(ReceiptUpload::new(b"hello".to_vec(), "text/plain"))
            .await;

        assert!(matches!(
            result,
            Err(ReceiptError::InvalidMimeType { .. })
        ));
        assert_eq!(file_count(&dir.path().join("temp")), 0);
        assert_eq!(file_count(&dir.path().join("receipts")), 0);
    }

    #[tokio::test]
    async fn test_oversize_declaration_rejected_before_write() {
        let (store, dir) = test_store(1024);

        let upload = ReceiptUpload {
            bytes: png_bytes(10, 10),
            content_type: "image/png".to_string(),
            declared_size: 2048,
        };
        let result = store.receive(upload).await;

        assert!(matches!(result, Err(ReceiptError::FileTooLarge { .. })));
        assert_eq!(file_count(&dir.path().join("temp")), 0);
    }

    #[tokio::test]
    async fn test_undecodable_bytes_clean_up_temp() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let result = store
            .store(ReceiptUpload::new(
                b"definitely not an image".to_vec(),
                "image/png",
            ))
            .await;

        assert!(matches!(result, Err(ReceiptError::Decode(_))));
        assert_eq!(file_count(&dir.path().join("temp")), 0);
        assert_eq!(file_count(&dir.path().join("receipts")), 0);
    }

    #[tokio::test]
    async fn test_replace_keeps_exactly_one_durable_file() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let first = store
            .store(ReceiptUpload::new(png_bytes(100, 100), "image/png"))
            .await
            .unwrap();
        let second = store
            .replace(
                Some(&first),
                ReceiptUpload::new(png_bytes(120, 80), "image/png"),
            )
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(file_count(&dir.path().join("receipts")), 1);
        assert!(
            !dir.path()
                .join("receipts")
                .join(first.file_name())
                .exists()
        );
    }

    #[tokio::test]
    async fn test_failed_replace_preserves_old_receipt() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let first = store
            .store(ReceiptUpload::new(png_bytes(100, 100), "image/png"))
            .await
            .unwrap();
        let result = store
            .replace(
                Some(&first),
                ReceiptUpload::new(b"garbage".to_vec(), "image/jpeg"),
            )
            .await;

        assert!(result.is_err());
        assert!(
            dir.path()
                .join("receipts")
                .join(first.file_name())
                .exists()
        );
    }

    #[tokio::test]
    async fn test_discard_is_idempotent() {
        let (store, dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let handle = store
            .store(ReceiptUpload::new(png_bytes(100, 100), "image/png"))
            .await
            .unwrap();

        store.discard(&handle).await;
        assert_eq!(file_count(&dir.path().join("receipts")), 0);

        // Deleting an already-absent file is not an error.
        store.discard(&handle).await;
    }

    #[tokio::test]
    async fn test_jpg_alias_accepted() {
        let (store, _dir) = test_store(ReceiptStoreConfig::DEFAULT_MAX_FILE_SIZE);

        let mut jpeg = Vec::new();
        let img = DynamicImage::ImageRgb8(RgbImage::new(50, 50));
        img.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();

        let handle = store
            .store(ReceiptUpload::new(jpeg, "image/jpg"))
            .await
            .unwrap();
        assert!(handle.file_name().ends_with(".jpg"));
    }
}
