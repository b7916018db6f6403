//! Request body ingestion for project writes and direct media uploads.
//!
//! `POST`/`PUT /api/projects` accept either a JSON body or
//! `multipart/form-data`. Multipart requests carry the same text fields plus
//! up to [`MAX_FILES_PER_REQUEST`] files under `image` or `media`. Every file
//! is checked against the [`UploadPolicy`] while it streams in, so nothing is
//! stored and no row is written for a rejected request.

use aidy_core::upload::{UploadPolicy, MAX_FILES_PER_REQUEST};
use aidy_db::models::project::ProjectPayload;
use aidy_media::MediaUpload;
use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A JSON body whose rejections (bad syntax, wrong content type, missing
/// fields) come back in the `{error, code}` shape.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Multipart field names that carry files.
pub const FILE_FIELDS: &[&str] = &["image", "media"];

/// A project create/update request, from either body encoding.
#[derive(Debug, Default)]
pub struct ProjectSubmission {
    pub payload: ProjectPayload,
    /// Validated files still to be stored; their URLs are appended after
    /// `payload.media_urls`.
    pub files: Vec<MediaUpload>,
}

impl FromRequest<AppState> for ProjectSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let JsonBody(payload) = JsonBody::<ProjectPayload>::from_request(req, state).await?;
            return Ok(Self {
                payload,
                files: Vec::new(),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        read_project_form(multipart, &state.config.media.upload_policy()).await
    }
}

/// Files of a `POST /api/media` request.
#[derive(Debug, Default)]
pub struct MediaBatch {
    pub files: Vec<MediaUpload>,
}

impl FromRequest<AppState> for MediaBatch {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let submission = read_project_form(multipart, &state.config.media.upload_policy()).await?;
        Ok(Self {
            files: submission.files,
        })
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

async fn read_project_form(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> AppResult<ProjectSubmission> {
    let mut submission = ProjectSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => submission.payload.title = Some(field.text().await?),
            "description" => submission.payload.description = Some(field.text().await?),
            "category" => submission.payload.category = Some(field.text().await?),
            "media_urls" | "media_urls[]" => {
                submission.payload.media_urls.push(field.text().await?);
            }
            n if FILE_FIELDS.contains(&n) => {
                if submission.files.len() == MAX_FILES_PER_REQUEST {
                    return Err(UploadPolicy::too_many_files().into());
                }
                // Browsers send an empty file part when no file was chosen.
                if field.file_name().is_none_or(str::is_empty) {
                    continue;
                }
                submission.files.push(read_file(field, policy).await?);
            }
            _ => {} // ignore unknown fields
        }
    }

    tracing::debug!(
        files = submission.files.len(),
        retained = submission.payload.media_urls.len(),
        "Multipart submission parsed"
    );
    Ok(submission)
}

/// Read one file field, enforcing the extension allow-list before reading
/// and the size cap on every chunk.
async fn read_file(mut field: Field<'_>, policy: &UploadPolicy) -> AppResult<MediaUpload> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    policy.check_extension(&file_name)?;
    let content_type = field.content_type().map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        policy.check_size((bytes.len() + chunk.len()) as u64)?;
        bytes.extend_from_slice(&chunk);
    }

    Ok(MediaUpload::new(file_name, content_type, bytes))
}
