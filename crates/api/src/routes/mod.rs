pub mod category;
pub mod health;
pub mod media;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                     service and database health
///
/// /categories                 list, create
/// /categories/{id}            rename, delete
///
/// /projects                   list, create (JSON or multipart)
/// /projects/{id}              get, update (JSON or multipart), delete
///
/// /media                      upload files, returns URLs
/// ```
///
/// [`api_routes`] holds everything except the upload-capable writes, which
/// live in [`upload_routes`] so the request timeout can skip them.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/categories", category::router())
        .nest("/projects", project::router())
}

/// Project create/update and direct media upload.
///
/// A media store write may outlast any fixed request timeout; cancelling the
/// handler mid-batch would leave stored files that nothing cleans up.
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .merge(project::upload_router())
        .merge(media::router())
}
