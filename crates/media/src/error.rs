//! Media transport errors.

use aidy_core::error::CoreError;

use crate::store::StoredMedia;

/// Failure of a single store operation.
///
/// `Display` is the bare reason so it can be embedded in user-facing
/// messages such as "Failed to upload a.jpg: {reason}".
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Local filesystem failure.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request to the media host failed (network, DNS, timeout).
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The media host answered with a non-2xx status.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// The media host answered 2xx but the body was not usable.
    #[error("Invalid media host response: {0}")]
    InvalidResponse(String),

    /// The URL does not belong to this store.
    #[error("URL is not managed by this store: {0}")]
    NotManaged(String),

    /// The transport cannot perform this operation (e.g. unsigned deletes).
    #[error("Operation not supported by {0}")]
    Unsupported(&'static str),
}

impl From<MediaError> for CoreError {
    fn from(err: MediaError) -> Self {
        CoreError::Upstream(err.to_string())
    }
}

/// A sequential batch upload stopped at `file_name`.
///
/// `uploaded` holds everything stored before the failure; those objects are
/// not referenced anywhere yet and should be passed to
/// [`remove_best_effort`](crate::remove_best_effort).
#[derive(Debug, thiserror::Error)]
#[error("Failed to upload {file_name}: {source}")]
pub struct BatchUploadError {
    pub file_name: String,
    #[source]
    pub source: MediaError,
    pub uploaded: Vec<StoredMedia>,
}

impl From<BatchUploadError> for CoreError {
    fn from(err: BatchUploadError) -> Self {
        CoreError::Upstream(err.to_string())
    }
}
