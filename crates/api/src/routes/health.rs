use axum::routing::get;
use axum::Router;
use tenderhub_core::store::Store;

use crate::handlers::health;
use crate::state::AppState;

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new().route("/health", get(health::health_check::<S>))
}
