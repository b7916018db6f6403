use std::path::PathBuf;
use std::sync::Arc;

use aidy_core::upload::{UploadPolicy, DEFAULT_MAX_UPLOAD_MB, MAX_FILES_PER_REQUEST};
use aidy_db::DbSettings;
use aidy_media::{CloudinaryAuth, CloudinaryStore, LocalDiskStore, MediaError, MediaStore};

/// Public path under which the local-disk backend serves uploaded files.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Timeout in seconds for every route except project writes and media
    /// uploads (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Where uploaded files go and how large they may be.
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `5000`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`      |
    ///
    /// See [`MediaConfig::from_env`] for the media variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_list(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            media: MediaConfig::from_env(),
        }
    }

    /// True when `CORS_ORIGINS` is `*`.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// Which [`MediaStore`] the server writes uploads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBackend {
    /// Files on local disk, served under [`UPLOADS_ROUTE`].
    Local {
        upload_dir: PathBuf,
        /// Absolute URL prefix (e.g. `https://api.example.com`); empty means
        /// URLs are relative (`/uploads/...`).
        public_base_url: String,
    },
    /// Signed Cloudinary uploads.
    Cloudinary {
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: String,
    },
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    pub max_upload_mb: u64,
}

impl MediaConfig {
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `MEDIA_BACKEND`         | `local`          |
    /// | `UPLOAD_DIR`            | `uploads`        |
    /// | `PUBLIC_BASE_URL`       | (empty)          |
    /// | `MAX_UPLOAD_MB`         | `50`             |
    /// | `CLOUDINARY_CLOUD_NAME` | required if cloudinary |
    /// | `CLOUDINARY_API_KEY`    | required if cloudinary |
    /// | `CLOUDINARY_API_SECRET` | required if cloudinary |
    /// | `CLOUDINARY_FOLDER`     | `aidy-portfolio` |
    pub fn from_env() -> Self {
        let max_upload_mb: u64 = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_MB.to_string())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid u64");

        let backend = match std::env::var("MEDIA_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => MediaBackend::Local {
                upload_dir: std::env::var("UPLOAD_DIR")
                    .unwrap_or_else(|_| "uploads".into())
                    .into(),
                public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or_default(),
            },
            "cloudinary" => MediaBackend::Cloudinary {
                cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                    .expect("CLOUDINARY_CLOUD_NAME must be set when MEDIA_BACKEND=cloudinary"),
                api_key: std::env::var("CLOUDINARY_API_KEY")
                    .expect("CLOUDINARY_API_KEY must be set when MEDIA_BACKEND=cloudinary"),
                api_secret: std::env::var("CLOUDINARY_API_SECRET")
                    .expect("CLOUDINARY_API_SECRET must be set when MEDIA_BACKEND=cloudinary"),
                folder: std::env::var("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|_| "aidy-portfolio".into()),
            },
            other => panic!("MEDIA_BACKEND must be 'local' or 'cloudinary', got '{other}'"),
        };

        Self {
            backend,
            max_upload_mb,
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::with_max_mb(self.max_upload_mb)
    }

    /// Request body cap: a full batch of maximum-size files plus form overhead.
    pub fn body_limit_bytes(&self) -> usize {
        let files = self.upload_policy().max_bytes as usize * MAX_FILES_PER_REQUEST;
        files.saturating_add(1024 * 1024)
    }

    /// Directory to serve under [`UPLOADS_ROUTE`], if the local backend is active.
    pub fn served_upload_dir(&self) -> Option<&PathBuf> {
        match &self.backend {
            MediaBackend::Local { upload_dir, .. } => Some(upload_dir),
            MediaBackend::Cloudinary { .. } => None,
        }
    }

    /// Construct the configured transport.
    pub fn build_store(&self) -> Result<Arc<dyn MediaStore>, MediaError> {
        match &self.backend {
            MediaBackend::Local {
                upload_dir,
                public_base_url,
            } => {
                let prefix = format!("{}{UPLOADS_ROUTE}", public_base_url.trim_end_matches('/'));
                Ok(Arc::new(LocalDiskStore::new(upload_dir.clone(), prefix)))
            }
            MediaBackend::Cloudinary {
                cloud_name,
                api_key,
                api_secret,
                folder,
            } => {
                let store = CloudinaryStore::new(
                    cloud_name.clone(),
                    Some(folder.clone()),
                    CloudinaryAuth::Signed {
                        api_key: api_key.clone(),
                        api_secret: api_secret.clone(),
                    },
                )?;
                Ok(Arc::new(store))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// How to reach Postgres: a URL, or discrete settings.
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    Url(String),
    Settings(DbSettings),
}

impl DatabaseConfig {
    /// `DATABASE_URL` wins when set; otherwise `DB_HOST`, `DB_PORT` (5432),
    /// `DB_USER`, `DB_PASSWORD`, `DB_NAME` and `DB_SSL_MODE` (`prefer`).
    pub fn from_env() -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Self::Url(url);
        }

        Self::Settings(DbSettings {
            host: std::env::var("DB_HOST").expect("DATABASE_URL or DB_HOST must be set"),
            port: std::env::var("DB_PORT")
                .unwrap_or_else(|_| "5432".into())
                .parse()
                .expect("DB_PORT must be a valid u16"),
            user: std::env::var("DB_USER").expect("DB_USER must be set"),
            password: std::env::var("DB_PASSWORD").unwrap_or_default(),
            database: std::env::var("DB_NAME").expect("DB_NAME must be set"),
            ssl_mode: std::env::var("DB_SSL_MODE").unwrap_or_else(|_| "prefer".into()),
        })
    }

    pub async fn connect(&self) -> Result<aidy_db::DbPool, sqlx::Error> {
        match self {
            Self::Url(url) => aidy_db::create_pool(url).await,
            Self::Settings(settings) => aidy_db::create_pool_with(settings.connect_options()?).await,
        }
    }
}
