//! Handlers for the `/categories` resource.

use aidy_core::category;
use aidy_core::error::CoreError;
use aidy_core::types::DbId;
use aidy_db::models::category::{Category, CategoryName};
use aidy_db::repositories::CategoryRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::ingest::JsonBody;
use crate::response::MessageResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: category::ENTITY,
        id,
    })
}

/// GET /api/categories
///
/// All categories, alphabetically.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /api/categories
///
/// The name is trimmed; blank and already-taken names are rejected with 400.
/// Existing projects already tagged with the name are linked to the new row.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CategoryName>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let name = category::validate_name(input.name.as_deref())?;

    if CategoryRepo::find_by_name(&state.pool, &name).await?.is_some() {
        return Err(category::name_taken().into());
    }

    let created = CategoryRepo::create(&state.pool, &name).await?;
    tracing::info!(category_id = created.id, name = %created.name, "Category created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/categories/{id}
///
/// Rename a category together with the `category` text of its projects.
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<CategoryName>,
) -> AppResult<Json<Category>> {
    let name = category::validate_name(input.name.as_deref())?;

    let current = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if current.name == name {
        return Ok(Json(current));
    }
    if CategoryRepo::find_by_name(&state.pool, &name).await?.is_some() {
        return Err(category::name_taken().into());
    }

    let renamed = CategoryRepo::rename(&state.pool, id, &name)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(category_id = id, from = %current.name, to = %renamed.name, "Category renamed");
    Ok(Json(renamed))
}

/// DELETE /api/categories/{id}
///
/// Refused while any project still uses the category's name.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let existing = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let in_use = CategoryRepo::count_projects_using(&state.pool, &existing.name).await?;
    if in_use > 0 {
        return Err(category::in_use(in_use).into());
    }

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(category_id = id, name = %existing.name, "Category deleted");
    Ok(Json(MessageResponse::new(category::MSG_DELETED)))
}
