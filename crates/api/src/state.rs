use std::sync::Arc;

use aidy_media::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: aidy_db::DbPool,
    /// Server configuration (upload policy, media backend, CORS).
    pub config: Arc<ServerConfig>,
    /// Active media transport for proxied uploads and cleanup.
    pub media: Arc<dyn MediaStore>,
}
