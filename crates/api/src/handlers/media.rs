//! Direct media upload, without touching the database.

use aidy_core::error::CoreError;
use aidy_media::{remove_best_effort, upload_sequentially};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::ingest::MediaBatch;
use crate::response::MediaUploadResponse;
use crate::state::AppState;

/// POST /api/media
///
/// Store every `image`/`media` file in order and return their URLs.
pub async fn upload(
    State(state): State<AppState>,
    batch: MediaBatch,
) -> AppResult<(StatusCode, Json<MediaUploadResponse>)> {
    if batch.files.is_empty() {
        return Err(AppError::BadRequest("No file provided".into()));
    }

    let items = match upload_sequentially(state.media.as_ref(), batch.files, |_| {}).await {
        Ok(items) => items,
        Err(err) => {
            let partial: Vec<String> = err.uploaded.iter().map(|m| m.url.clone()).collect();
            remove_best_effort(state.media.as_ref(), &partial).await;
            return Err(CoreError::from(err).into());
        }
    };

    tracing::info!(count = items.len(), store = state.media.name(), "Media uploaded");
    let urls = items.iter().map(|m| m.url.clone()).collect();
    Ok((StatusCode::CREATED, Json(MediaUploadResponse { urls, items })))
}
