//! Shared response body types for API handlers.
//!
//! Entity endpoints return the entity itself (no envelope); these cover the
//! remaining shapes.

use aidy_media::StoredMedia;
use serde::Serialize;

/// `{ "message": ... }` confirmation body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by `POST /api/media`.
#[derive(Debug, Serialize)]
pub struct MediaUploadResponse {
    /// Public URLs in upload order.
    pub urls: Vec<String>,
    /// The same URLs with their render kind.
    pub items: Vec<StoredMedia>,
}
