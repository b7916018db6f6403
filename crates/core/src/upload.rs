//! Upload limits and progress arithmetic.

use crate::error::CoreError;
use crate::media::{extension_of, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default per-file size cap (50 MiB).
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

/// Maximum number of files accepted in one multipart request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Limits applied to every uploaded file before it reaches a media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::with_max_mb(DEFAULT_MAX_UPLOAD_MB)
    }
}

impl UploadPolicy {
    /// Policy allowing every known image and video extension up to `max_mb`.
    pub fn with_max_mb(max_mb: u64) -> Self {
        Self {
            max_bytes: max_mb * 1024 * 1024,
            allowed_extensions: IMAGE_EXTENSIONS
                .iter()
                .chain(VIDEO_EXTENSIONS)
                .map(|e| e.to_string())
                .collect(),
        }
    }

    pub fn max_mb(&self) -> u64 {
        self.max_bytes / (1024 * 1024)
    }

    /// Check a file name's extension and return it lowercased.
    pub fn check_extension(&self, file_name: &str) -> Result<String, CoreError> {
        match extension_of(file_name) {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(ext),
            Some(ext) => Err(CoreError::Payload(format!(
                "Format file tidak didukung: .{ext}"
            ))),
            None => Err(CoreError::Payload(format!(
                "Format file tidak didukung: {file_name}"
            ))),
        }
    }

    /// Check a (possibly partial) byte count against the size cap.
    pub fn check_size(&self, len: u64) -> Result<(), CoreError> {
        if len > self.max_bytes {
            Err(self.too_large())
        } else {
            Ok(())
        }
    }

    pub fn too_large(&self) -> CoreError {
        CoreError::Payload(format!(
            "File terlalu besar. Maksimal {}MB.",
            self.max_mb()
        ))
    }

    /// Error for a request carrying more than [`MAX_FILES_PER_REQUEST`] files.
    pub fn too_many_files() -> CoreError {
        CoreError::Payload(format!(
            "Terlalu banyak file. Maksimal {MAX_FILES_PER_REQUEST} file."
        ))
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// File-granular progress of a sequential multi-file upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadProgress {
    pub completed: usize,
    pub total: usize,
}

impl UploadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// `completed / total * 100`, rounded. An empty batch reports 0.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.completed as f64 / self.total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Record one more finished file.
    pub fn advance(&mut self) {
        self.completed = (self.completed + 1).min(self.total);
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}
