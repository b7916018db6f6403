use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Read and delete routes mounted at `/projects`.
///
/// ```text
/// GET    /        -> list
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list))
        .route("/{id}", get(project::get_by_id).delete(project::delete))
}

/// Write routes, which may carry multipart uploads.
///
/// ```text
/// POST   /projects        -> create
/// PUT    /projects/{id}   -> update
/// ```
pub fn upload_router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(project::create))
        .route("/projects/{id}", put(project::update))
}
