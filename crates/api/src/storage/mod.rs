//! Attachment blob storage.
//!
//! Images are written under keys of the form `wonders/{uuid}/{file_name}`.
//! The key is what an inquiry records (next to the public URL) so the
//! blob can be removed when the inquiry is deleted or its submission
//! fails.

pub mod local;

use async_trait::async_trait;
use axum::body::Bytes;
use uuid::Uuid;
use wonders_core::inquiry::AttachedImage;
use wonders_core::validation::AttachmentCandidate;

pub use local::LocalBlobStore;

/// Prefix shared by every attachment key.
pub const KEY_PREFIX: &str = "wonders";

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key is not one this service would have issued.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Where attachment bytes live.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, BlobError>;

    /// Remove the blob at `key`. Removing a missing blob is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

/// An image received with a submission, not yet stored.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PendingUpload {
    pub fn candidate(&self) -> AttachmentCandidate<'_> {
        AttachmentCandidate {
            file_name: &self.file_name,
            content_type: &self.content_type,
            size_bytes: self.bytes.len() as u64,
        }
    }
}

/// Fresh key for an upload named `file_name`.
pub fn attachment_key(file_name: &str) -> String {
    format!("{KEY_PREFIX}/{}/{}", Uuid::new_v4(), sanitize_file_name(file_name))
}

/// Reduce a client-supplied name to `[A-Za-z0-9._-]`, never empty and
/// never a dot-only path segment.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Check that `key` has the shape [`attachment_key`] produces.
pub fn validate_key(key: &str) -> Result<(), BlobError> {
    let mut segments = key.split('/');
    let well_formed = segments.next() == Some(KEY_PREFIX)
        && segments
            .next()
            .is_some_and(|dir| Uuid::parse_str(dir).is_ok())
        && segments
            .next()
            .is_some_and(|name| !name.is_empty() && sanitize_file_name(name) == name)
        && segments.next().is_none();
    if well_formed {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

/// Store every upload in order.
///
/// If any upload fails, the ones already stored are removed (best effort)
/// and the error is returned, so a submission never half-exists.
pub async fn upload_all(
    blobs: &dyn BlobStore,
    uploads: &[PendingUpload],
) -> Result<Vec<AttachedImage>, BlobError> {
    let mut stored: Vec<AttachedImage> = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let key = attachment_key(&upload.file_name);
        match blobs
            .put(&key, upload.bytes.clone(), &upload.content_type)
            .await
        {
            Ok(url) => stored.push(AttachedImage {
                url,
                file_name: upload.file_name.clone(),
                storage_key: key,
            }),
            Err(e) => {
                let keys: Vec<String> = stored.into_iter().map(|img| img.storage_key).collect();
                remove_all(blobs, &keys).await;
                return Err(e);
            }
        }
    }
    Ok(stored)
}

/// Delete every key, logging (not returning) failures.
pub async fn remove_all(blobs: &dyn BlobStore, keys: &[String]) {
    for key in keys {
        if let Err(e) = blobs.delete(key).await {
            tracing::warn!(storage_key = %key, error = %e, "Failed to remove attachment");
        }
    }
}
