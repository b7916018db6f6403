//! Handlers for the `/projects` resource.
//!
//! Create and update accept JSON or multipart (see [`ProjectSubmission`]).
//! Files are stored after validation and before the row is written; if the
//! write fails, the freshly stored files are removed again.

use aidy_core::error::CoreError;
use aidy_core::project::{self, dropped_media};
use aidy_core::types::DbId;
use aidy_db::models::project::{Project, ProjectWrite};
use aidy_db::repositories::ProjectRepo;
use aidy_media::{remove_best_effort, upload_sequentially, MediaUpload};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::ingest::ProjectSubmission;
use crate::response::MessageResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: project::ENTITY,
        id,
    })
}

/// GET /api/projects
///
/// All projects, newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    submission: ProjectSubmission,
) -> AppResult<(StatusCode, Json<Project>)> {
    let mut write = ProjectWrite::for_create(submission.payload)?;
    let uploaded = store_files(&state, submission.files).await?;
    write.media.extend(uploaded.iter().cloned());

    let created = match ProjectRepo::create(&state.pool, &write).await {
        Ok(created) => created,
        Err(e) => {
            remove_best_effort(state.media.as_ref(), &uploaded).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        project_id = created.id,
        media = created.media_urls().len(),
        uploaded = uploaded.len(),
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/projects/{id}
///
/// Full replacement. Media URLs no longer referenced afterwards are removed
/// from the media store on a best-effort basis.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    submission: ProjectSubmission,
) -> AppResult<Json<Project>> {
    let before = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut write = ProjectWrite::for_update(submission.payload)?;
    let uploaded = store_files(&state, submission.files).await?;
    write.media.extend(uploaded.iter().cloned());

    let updated = match ProjectRepo::update(&state.pool, id, &write).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            remove_best_effort(state.media.as_ref(), &uploaded).await;
            return Err(not_found(id));
        }
        Err(e) => {
            remove_best_effort(state.media.as_ref(), &uploaded).await;
            return Err(e.into());
        }
    };

    let orphaned = dropped_media(before.media_urls(), updated.media_urls());
    if !orphaned.is_empty() {
        let removed = remove_best_effort(state.media.as_ref(), &orphaned).await;
        tracing::debug!(project_id = id, orphaned = orphaned.len(), removed, "Dropped media cleaned up");
    }

    tracing::info!(project_id = id, media = updated.media_urls().len(), "Project updated");
    Ok(Json(updated))
}

/// DELETE /api/projects/{id}
///
/// Removes the row, then the project's media on a best-effort basis.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let removed = remove_best_effort(state.media.as_ref(), deleted.media_urls()).await;
    tracing::info!(project_id = id, removed, "Project deleted");
    Ok(Json(MessageResponse::new(project::MSG_DELETED)))
}

/// Store validated files in order; on failure, remove the ones already stored.
pub(crate) async fn store_files(
    state: &AppState,
    files: Vec<MediaUpload>,
) -> AppResult<Vec<String>> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    match upload_sequentially(state.media.as_ref(), files, |_| {}).await {
        Ok(stored) => Ok(stored.into_iter().map(|m| m.url).collect()),
        Err(err) => {
            let partial: Vec<String> = err.uploaded.iter().map(|m| m.url.clone()).collect();
            remove_best_effort(state.media.as_ref(), &partial).await;
            Err(CoreError::from(err).into())
        }
    }
}
