use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// `POST /media`.
pub fn router() -> Router<AppState> {
    Router::new().route("/media", post(media::upload))
}
