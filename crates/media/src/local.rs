//! Local-disk media store.
//!
//! Files are written under `root` with generated names and exposed by the
//! API's static file route. URLs are `{public_prefix}/{file_name}`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::MediaError;
use crate::store::{MediaStore, MediaUpload, StoredMedia};

/// Stores media files in a flat directory.
pub struct LocalDiskStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalDiskStore {
    /// `public_prefix` is either a path (`/uploads`) or an absolute URL
    /// (`https://api.example.com/uploads`); a trailing slash is ignored.
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), MediaError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn stored_name(upload: &MediaUpload) -> String {
        let stamp = chrono::Utc::now().timestamp_millis();
        let id = uuid::Uuid::new_v4().simple();
        match upload.extension() {
            Some(ext) => format!("{stamp}-{id}.{ext}"),
            None => format!("{stamp}-{id}"),
        }
    }

    /// Map a public URL back to a file inside `root`.
    ///
    /// Only plain file names directly under the prefix are accepted.
    fn path_for(&self, url: &str) -> Result<PathBuf, MediaError> {
        let name = url
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| MediaError::NotManaged(url.to_string()))?;

        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return Err(MediaError::NotManaged(url.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl MediaStore for LocalDiskStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn put(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        self.ensure_root().await?;

        let name = Self::stored_name(&upload);
        let full_path = self.root.join(&name);

        // Write to a temp file first so a half-written upload is never served.
        let temp_path = self.root.join(format!(".{name}.tmp"));
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&upload.bytes).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &full_path).await?;

        tracing::debug!(path = %full_path.display(), size = upload.bytes.len(), "local_store: written");

        Ok(StoredMedia {
            url: format!("{}/{name}", self.public_prefix),
            kind: upload.kind(),
        })
    }

    async fn remove(&self, url: &str) -> Result<(), MediaError> {
        let path = self.path_for(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
