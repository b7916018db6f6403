use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::response::MessageResponse;
use crate::state::AppState;

/// Response body for the health check endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /api/health
///
/// Always answers 200 while the process is up; `db_healthy` reports whether
/// the database answered a trivial query.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match aidy_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: "OK",
        message: "Server is running",
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// GET /
async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to AIDY API"))
}

/// `/health`, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Root-level welcome route.
pub fn root_router() -> Router<AppState> {
    Router::new().route("/", get(welcome))
}
