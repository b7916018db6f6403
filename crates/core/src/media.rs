//! Media URL classification and parsing.
//!
//! Media entries are plain URLs. Whether an entry is a video or an image is
//! decided purely by its file extension.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// File extensions rendered as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// File extensions rendered as image.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

static VIDEO_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mp4|webm|mov)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a stored media URL by its extension.
    pub fn of_url(url: &str) -> Self {
        if VIDEO_URL_RE.is_match(url) {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Classify a local file about to be uploaded by its MIME type.
    pub fn of_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Resource-type segment used by the hosted media store.
    pub fn resource_type(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Videos get native playback controls; images are static.
    pub fn has_playback_controls(self) -> bool {
        matches!(self, Self::Video)
    }
}

/// A media URL paired with its render kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub url: String,
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = MediaKind::of_url(&url);
        Self { url, kind }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Read a project's `media` field, whatever shape it arrived in.
///
/// Accepts a structured array, or a string holding a JSON-encoded array.
/// Non-string array entries are skipped. When nothing usable is found the
/// legacy `image_url` is used as a single-entry list.
pub fn parse_media_field(media: &serde_json::Value, image_url: Option<&str>) -> Vec<String> {
    let parsed = match media {
        serde_json::Value::Array(items) => strings_of(items),
        serde_json::Value::String(encoded) => {
            match serde_json::from_str::<serde_json::Value>(encoded) {
                Ok(serde_json::Value::Array(items)) => strings_of(&items),
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    };

    if parsed.is_empty() {
        image_url
            .filter(|u| !u.is_empty())
            .map(|u| vec![u.to_string()])
            .unwrap_or_default()
    } else {
        parsed
    }
}

fn strings_of(items: &[serde_json::Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Resolve a stored URL for display: absolute URLs pass through, relative
/// paths (local-disk uploads) are prefixed with `origin`.
pub fn resolve_url(url: &str, origin: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{}{url}", origin.trim_end_matches('/'))
    }
}

/// Static thumbnail for a grid card.
///
/// The media host derives a poster frame for a video when the extension is
/// swapped for `.jpg`; image URLs are returned unchanged.
pub fn card_thumbnail(url: &str) -> String {
    VIDEO_URL_RE.replace(url, ".jpg").into_owned()
}

/// Lowercased extension of a file name or URL path, without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    let file = name.rsplit('/').next().unwrap_or(name);
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
