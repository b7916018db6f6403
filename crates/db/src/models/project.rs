//! Project entity model and DTOs.

use aidy_core::category::DEFAULT_CATEGORY;
use aidy_core::error::CoreError;
use aidy_core::project::{cover_image, deserialize_media_urls, normalize_media, validate_title};
use aidy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `image_url` always equals the first `media` entry (or null); it is kept for
/// clients that only render a single cover.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub media: Json<Vec<String>>,
    pub category: Option<String>,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn media_urls(&self) -> &[String] {
        &self.media.0
    }
}

/// Request body for creating or updating a project.
///
/// Update is a full replacement, so both operations share this shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_media_urls")]
    pub media_urls: Vec<String>,
}

/// Validated column values for an insert or a full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectWrite {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub media: Vec<String>,
}

impl ProjectWrite {
    /// Validate a payload for insertion; a missing category becomes the default.
    pub fn for_create(payload: ProjectPayload) -> Result<Self, CoreError> {
        let mut write = Self::validate(payload)?;
        if write.category.is_none() {
            write.category = Some(DEFAULT_CATEGORY.to_string());
        }
        Ok(write)
    }

    /// Validate a payload for a full-replacement update; nothing is defaulted.
    pub fn for_update(payload: ProjectPayload) -> Result<Self, CoreError> {
        Self::validate(payload)
    }

    fn validate(payload: ProjectPayload) -> Result<Self, CoreError> {
        let title = validate_title(payload.title.as_deref())?;
        let category = payload.category.filter(|c| !c.trim().is_empty());
        Ok(Self {
            title,
            description: payload.description,
            category,
            media: normalize_media(payload.media_urls),
        })
    }

    /// Value stored in `image_url`.
    pub fn image_url(&self) -> Option<String> {
        cover_image(&self.media)
    }
}
