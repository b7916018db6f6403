//! Project field rules: title validation, media list normalization and the
//! derived `image_url` cover.

use serde::{Deserialize, Deserializer};

use crate::error::CoreError;

/// Entity label used in [`CoreError::NotFound`].
pub const ENTITY: &str = "Project";

/// Rejection message for a blank title.
pub const MSG_TITLE_EMPTY: &str = "Judul proyek tidak boleh kosong";

/// Confirmation message returned after a delete.
pub const MSG_DELETED: &str = "Project deleted successfully";

/// Validate a submitted title and return its trimmed form.
pub fn validate_title(raw: Option<&str>) -> Result<String, CoreError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(MSG_TITLE_EMPTY.into()));
    }
    Ok(trimmed.to_string())
}

/// Trim every URL and drop blank entries, preserving order.
pub fn normalize_media(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

/// The cover image stored in `image_url`: the first media entry, if any.
pub fn cover_image(media: &[String]) -> Option<String> {
    media.first().cloned()
}

/// URLs present in `before` but no longer referenced by `after`.
///
/// Used to find media-host objects orphaned by an update.
pub fn dropped_media(before: &[String], after: &[String]) -> Vec<String> {
    before
        .iter()
        .filter(|url| !after.contains(url))
        .cloned()
        .collect()
}

/// Deserialize `media_urls` from an array, a single string, or null/absent.
///
/// A lone string is wrapped into a one-element list; null yields an empty list.
pub fn deserialize_media_urls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(url)) => vec![url],
        Some(OneOrMany::Many(urls)) => urls,
        None => Vec::new(),
    })
}
