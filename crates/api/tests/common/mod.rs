#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aidy_api::app::build_app;
use aidy_api::config::{MediaBackend, MediaConfig, ServerConfig};
use aidy_api::state::AppState;
use aidy_media::{LocalDiskStore, MediaError, MediaStore, MediaUpload, StoredMedia};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Size cap used by test apps, small enough to exceed cheaply.
pub const TEST_MAX_UPLOAD_MB: u64 = 1;

pub const BOUNDARY: &str = "aidy-test-boundary";

/// Build a test `ServerConfig` with safe defaults and a local media backend
/// rooted at `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        media: MediaConfig {
            backend: MediaBackend::Local {
                upload_dir: upload_dir.to_path_buf(),
                public_base_url: String::new(),
            },
            max_upload_mb: TEST_MAX_UPLOAD_MB,
        },
    }
}

/// A router over the full middleware stack plus the temporary upload
/// directory it writes to. The directory lives as long as this value.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Names of the files currently in the upload directory.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Build the full application router with the local-disk media store.
///
/// Uses the same `build_app` as `main.rs`, so integration tests exercise the
/// production middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery, body limit, static uploads).
pub fn build_test_app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path());
    let media = config.media.build_store().unwrap();
    let state = AppState {
        pool,
        config: Arc::new(config),
        media,
    };
    TestApp {
        router: build_app(state),
        uploads,
    }
}

/// Build the application over a custom media store.
pub fn build_test_app_with_store(pool: PgPool, media: Arc<dyn MediaStore>) -> TestApp {
    build_test_app_with(pool, media, |_| {})
}

/// Build the application over a custom media store, adjusting the config
/// before the router is assembled.
pub fn build_test_app_with(
    pool: PgPool,
    media: Arc<dyn MediaStore>,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = test_config(uploads.path());
    configure(&mut config);
    let state = AppState {
        pool,
        config: Arc::new(config),
        media,
    };
    TestApp {
        router: build_app(state),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Local store that fails `put` for file names starting with "broken" and
/// records every removal.
pub struct FlakyStore {
    inner: LocalDiskStore,
    pub removed: Mutex<Vec<String>>,
}

impl FlakyStore {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: LocalDiskStore::new(root, "/uploads"),
            removed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaStore for FlakyStore {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn put(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        if upload.file_name.starts_with("broken") {
            return Err(MediaError::HttpStatus {
                status: 502,
                message: "Bad gateway".into(),
            });
        }
        self.inner.put(upload).await
    }

    async fn remove(&self, url: &str) -> Result<(), MediaError> {
        self.removed.lock().unwrap().push(url.to_string());
        self.inner.remove(url).await
    }
}

/// Local store that sleeps before storing file names starting with "slow".
pub struct SlowStore {
    inner: LocalDiskStore,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(root: &Path, delay: Duration) -> Self {
        Self {
            inner: LocalDiskStore::new(root, "/uploads"),
            delay,
        }
    }
}

#[async_trait]
impl MediaStore for SlowStore {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn put(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        if upload.file_name.starts_with("slow") {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.put(upload).await
    }

    async fn remove(&self, url: &str) -> Result<(), MediaError> {
        self.inner.remove(url).await
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// One part of a `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

pub fn file<'a>(field: &'a str, file_name: &'a str, bytes: Vec<u8>) -> Part<'a> {
    let content_type = if file_name.ends_with(".mp4") {
        "video/mp4"
    } else {
        "image/jpeg"
    };
    Part::File {
        field,
        file_name,
        content_type,
        bytes,
    }
}

pub fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                field,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    parts: Vec<Part<'_>>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}
