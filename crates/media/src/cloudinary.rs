//! Cloudinary media store.
//!
//! Two modes share one transport:
//!
//! - **Signed** (server side): requests carry the API key, a timestamp and a
//!   SHA-256 signature over the sorted parameters. The account must be set
//!   to the SHA-256 signature algorithm. Supports [`remove`](MediaStore::remove).
//! - **Unsigned** (client side): requests name a public upload preset and
//!   carry no secret. Deletes are not possible in this mode.

use std::time::Duration;

use aidy_core::media::MediaKind;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::MediaError;
use crate::store::{MediaStore, MediaUpload, StoredMedia};

/// Public Cloudinary API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Upper bound for a single upload request; videos can be large.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How requests are authorized.
#[derive(Debug, Clone)]
pub enum CloudinaryAuth {
    Signed { api_key: String, api_secret: String },
    Unsigned { upload_preset: String },
}

/// Media store backed by the Cloudinary upload API.
pub struct CloudinaryStore {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    folder: Option<String>,
    auth: CloudinaryAuth,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    #[serde(default)]
    resource_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

impl CloudinaryStore {
    pub fn new(
        cloud_name: impl Into<String>,
        folder: Option<String>,
        auth: CloudinaryAuth,
    ) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            cloud_name: cloud_name.into(),
            folder: folder.filter(|f| !f.is_empty()),
            auth,
        })
    }

    /// Point the store at a different API root (used by tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/{}/{resource_type}/{action}",
            self.api_base, self.cloud_name
        )
    }

    /// Add authorization fields to `params` (already holding the operation's
    /// own parameters) and return the full list of text fields to send.
    fn authorize(&self, mut params: Vec<(String, String)>) -> Vec<(String, String)> {
        match &self.auth {
            CloudinaryAuth::Signed {
                api_key,
                api_secret,
            } => {
                params.push((
                    "timestamp".into(),
                    chrono::Utc::now().timestamp().to_string(),
                ));
                let signature = sign(&params, api_secret);
                params.push(("api_key".into(), api_key.clone()));
                params.push(("signature".into(), signature));
            }
            CloudinaryAuth::Unsigned { upload_preset } => {
                params.push(("upload_preset".into(), upload_preset.clone()));
            }
        }
        params
    }

    async fn post(&self, url: &str, form: Form) -> Result<reqwest::Response, MediaError> {
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or_else(|_| format!("Media host returned HTTP {}", status.as_u16()));
        Err(MediaError::HttpStatus {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn put(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        let kind = upload.kind();

        let mut params = Vec::new();
        if let Some(folder) = &self.folder {
            params.push(("folder".to_string(), folder.clone()));
        }
        let fields = self.authorize(params);

        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(ct) = upload.content_type.as_deref() {
            part = part.mime_str(ct)?;
        }
        let mut form = Form::new().part("file", part);
        for (key, value) in fields {
            form = form.text(key, value);
        }

        let url = self.endpoint(kind.resource_type(), "upload");
        let body: UploadResponse = self
            .post(&url, form)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        let kind = match body.resource_type.as_deref() {
            Some("video") => MediaKind::Video,
            Some("image") => MediaKind::Image,
            _ => kind,
        };
        Ok(StoredMedia {
            url: body.secure_url,
            kind,
        })
    }

    async fn remove(&self, url: &str) -> Result<(), MediaError> {
        if matches!(self.auth, CloudinaryAuth::Unsigned { .. }) {
            return Err(MediaError::Unsupported("unsigned cloudinary uploads"));
        }

        let asset = parse_delivery_url(url, &self.cloud_name)
            .ok_or_else(|| MediaError::NotManaged(url.to_string()))?;

        let fields = self.authorize(vec![("public_id".into(), asset.public_id)]);
        let mut form = Form::new();
        for (key, value) in fields {
            form = form.text(key, value);
        }

        let endpoint = self.endpoint(&asset.resource_type, "destroy");
        let body: DestroyResponse = self
            .post(&endpoint, form)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::InvalidResponse(format!(
                "unexpected destroy result '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// SHA-256 request signature: `k1=v1&k2=v2...` sorted by key, then the secret.
pub fn sign(params: &[(String, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{joined}{api_secret}").as_bytes());
    format!("{digest:x}")
}

/// Identity of a stored asset, recovered from its delivery URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredAsset {
    pub resource_type: String,
    pub public_id: String,
}

/// Parse `https://res.cloudinary.com/{cloud}/{type}/upload/[...]/v123/{id}.{ext}`.
///
/// Returns `None` for URLs of another cloud or without an `/upload/` segment.
pub fn parse_delivery_url(url: &str, cloud_name: &str) -> Option<DeliveredAsset> {
    let path = url.split(['?', '#']).next()?;
    let marker = format!("/{cloud_name}/");
    let (_, after_cloud) = path.split_once(&marker)?;

    let mut segments = after_cloud.split('/');
    let resource_type = segments.next()?.to_string();
    if segments.next()? != "upload" {
        return None;
    }

    let rest: Vec<&str> = segments.collect();
    let start = rest
        .iter()
        .position(|s| is_version_segment(s))
        .map(|i| i + 1)
        .unwrap_or(0);
    let id_segments = &rest[start..];
    let (last, dirs) = id_segments.split_last()?;

    let file_stem = last.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(last);
    if file_stem.is_empty() {
        return None;
    }

    let mut public_id = dirs.join("/");
    if !public_id.is_empty() {
        public_id.push('/');
    }
    public_id.push_str(file_stem);

    Some(DeliveredAsset {
        resource_type,
        public_id,
    })
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sorts_parameters_and_appends_secret() {
        let params = vec![
            ("timestamp".to_string(), "1700000000".to_string()),
            ("folder".to_string(), "aidy-portfolio".to_string()),
        ];
        // sha256("folder=aidy-portfolio&timestamp=1700000000secret")
        assert_eq!(
            sign(&params, "secret"),
            "22b3a1bc02f2b9e5be965edf6568bd07a61b8c89482b040d748ab0f37a27a5f4"
        );
    }

    #[test]
    fn parses_versioned_url_with_folder() {
        let asset = parse_delivery_url(
            "https://res.cloudinary.com/demo/image/upload/v1712345678/aidy-portfolio/abc123.jpg",
            "demo",
        )
        .unwrap();
        assert_eq!(asset.resource_type, "image");
        assert_eq!(asset.public_id, "aidy-portfolio/abc123");
    }

    #[test]
    fn skips_transformations_before_version() {
        let asset = parse_delivery_url(
            "https://res.cloudinary.com/demo/video/upload/c_fill,w_300/v1/clips/tour.mp4?x=1",
            "demo",
        )
        .unwrap();
        assert_eq!(asset.resource_type, "video");
        assert_eq!(asset.public_id, "clips/tour");
    }

    #[test]
    fn unversioned_url_uses_whole_path() {
        let asset =
            parse_delivery_url("https://res.cloudinary.com/demo/image/upload/sample.png", "demo")
                .unwrap();
        assert_eq!(asset.public_id, "sample");
    }

    #[test]
    fn foreign_urls_are_rejected() {
        assert!(parse_delivery_url("https://res.cloudinary.com/other/image/upload/a.jpg", "demo").is_none());
        assert!(parse_delivery_url("/uploads/a.jpg", "demo").is_none());
        assert!(parse_delivery_url("https://res.cloudinary.com/demo/image/fetch/a.jpg", "demo").is_none());
    }

    #[tokio::test]
    async fn unsigned_store_cannot_remove() {
        let store = CloudinaryStore::new(
            "demo",
            None,
            CloudinaryAuth::Unsigned {
                upload_preset: "public".into(),
            },
        )
        .unwrap();
        let result = store
            .remove("https://res.cloudinary.com/demo/image/upload/v1/a.jpg")
            .await;
        assert!(matches!(result, Err(MediaError::Unsupported(_))));
    }
}
