use aidy_media::{CloudinaryAuth, CloudinaryStore, MediaError};

/// Default API root used when `AIDY_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the `/api` segment.
    pub api_url: String,
    /// Media host account for direct uploads.
    pub cloud_name: Option<String>,
    /// Unsigned upload preset for direct uploads.
    pub upload_preset: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cloud_name: None,
            upload_preset: None,
        }
    }
}

impl ClientConfig {
    /// | Env Var                    | Default                     |
    /// |----------------------------|-----------------------------|
    /// | `AIDY_API_URL`             | `http://localhost:5000/api` |
    /// | `CLOUDINARY_CLOUD_NAME`    | (none)                      |
    /// | `CLOUDINARY_UPLOAD_PRESET` | (none)                      |
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("AIDY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cloud_name: non_empty("CLOUDINARY_CLOUD_NAME"),
            upload_preset: non_empty("CLOUDINARY_UPLOAD_PRESET"),
        }
    }

    /// Server origin (API root without the trailing `/api`), used to resolve
    /// relative media URLs.
    pub fn api_origin(&self) -> String {
        let trimmed = self.api_url.trim_end_matches('/');
        trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
    }

    /// Unsigned direct-upload store, when both media host settings are present.
    pub fn direct_upload_store(&self) -> Result<Option<CloudinaryStore>, MediaError> {
        match (&self.cloud_name, &self.upload_preset) {
            (Some(cloud), Some(preset)) => CloudinaryStore::new(
                cloud.clone(),
                None,
                CloudinaryAuth::Unsigned {
                    upload_preset: preset.clone(),
                },
            )
            .map(Some),
            _ => Ok(None),
        }
    }
}
