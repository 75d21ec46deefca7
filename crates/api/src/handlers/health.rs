use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tenderhub_core::store::Store;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the store is reachable.
    pub db_healthy: bool,
}

/// GET /health -- returns service and store health.
pub async fn health_check<S: Store>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    let db_healthy = state.store.ping().await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// GET /api/ping -- liveness only, no dependencies touched.
pub async fn ping() -> &'static str {
    "ok"
}
