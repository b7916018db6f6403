//! The [`MediaStore`] trait and the batch helpers built on it.

use aidy_core::media::{extension_of, MediaKind};
use aidy_core::upload::UploadProgress;
use async_trait::async_trait;
use serde::Serialize;

use crate::error::{BatchUploadError, MediaError};

/// A file on its way to a media store.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Video or image, from the MIME type when known, else the extension.
    pub fn kind(&self) -> MediaKind {
        match &self.content_type {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => {
                MediaKind::of_content_type(ct)
            }
            _ => MediaKind::of_url(&self.file_name),
        }
    }

    /// Lowercased extension of the original file name.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.file_name)
    }
}

/// A stored object: its public URL and how it should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMedia {
    pub url: String,
    pub kind: MediaKind,
}

/// Storage transport for media files.
///
/// Implementations: [`LocalDiskStore`](crate::LocalDiskStore) and
/// [`CloudinaryStore`](crate::CloudinaryStore).
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short transport name for logs.
    fn name(&self) -> &'static str;

    /// Store one file and return its public URL.
    async fn put(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError>;

    /// Remove the object behind a URL previously returned by [`put`](Self::put).
    ///
    /// Removing an object that no longer exists succeeds.
    async fn remove(&self, url: &str) -> Result<(), MediaError>;
}

/// Upload files one at a time, in order, reporting file-granular progress.
///
/// Stops at the first failure; see [`BatchUploadError`].
pub async fn upload_sequentially<F>(
    store: &dyn MediaStore,
    uploads: Vec<MediaUpload>,
    mut on_progress: F,
) -> Result<Vec<StoredMedia>, BatchUploadError>
where
    F: FnMut(UploadProgress) + Send,
{
    let mut progress = UploadProgress::new(uploads.len());
    let mut stored = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let file_name = upload.file_name.clone();
        match store.put(upload).await {
            Ok(media) => {
                tracing::debug!(store = store.name(), file = %file_name, url = %media.url, "Media stored");
                stored.push(media);
                progress.advance();
                on_progress(progress);
            }
            Err(source) => {
                tracing::warn!(store = store.name(), file = %file_name, error = %source, "Media upload failed");
                return Err(BatchUploadError {
                    file_name,
                    source,
                    uploaded: stored,
                });
            }
        }
    }

    Ok(stored)
}

/// Remove each URL, logging failures instead of returning them.
///
/// Returns the number of URLs that were removed successfully.
pub async fn remove_best_effort<I, S>(store: &dyn MediaStore, urls: I) -> usize
where
    I: IntoIterator<Item = S> + Send,
    I::IntoIter: Send,
    S: AsRef<str> + Send,
{
    let mut removed = 0;
    for url in urls {
        let url = url.as_ref();
        match store.remove(url).await {
            Ok(()) => {
                tracing::info!(store = store.name(), %url, "Media removed");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(store = store.name(), %url, error = %e, "Media cleanup failed, object left on host");
            }
        }
    }
    removed
}
