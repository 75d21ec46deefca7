//! Route definitions for the `/bids` resource.
//!
//! The first path segment is a tender ID for `list` and `reviews` and a
//! bid ID everywhere else; the router requires one parameter name per
//! position, so both are spelled `{id}`.
//!
//! ```text
//! POST   /new                       create
//! GET    /my                        list_mine
//! GET    /{id}/list                 list_for_tender
//! GET    /{id}/reviews              reviews
//! GET    /{id}/status               get_status
//! PUT    /{id}/status               set_status
//! PATCH  /{id}/edit                 edit
//! PUT    /{id}/rollback/{version}   rollback
//! GET    /{id}/versions             versions
//! PUT    /{id}/submit_decision      submit_decision
//! PUT    /{id}/feedback             submit_feedback
//! ```

use axum::routing::{get, patch, post, put};
use axum::Router;
use tenderhub_core::store::Store;

use crate::handlers::bids;
use crate::state::AppState;

pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/new", post(bids::create::<S>))
        .route("/my", get(bids::list_mine::<S>))
        .route("/{id}/list", get(bids::list_for_tender::<S>))
        .route("/{id}/reviews", get(bids::reviews::<S>))
        .route(
            "/{id}/status",
            get(bids::get_status::<S>).put(bids::set_status::<S>),
        )
        .route("/{id}/edit", patch(bids::edit::<S>))
        .route("/{id}/rollback/{version}", put(bids::rollback::<S>))
        .route("/{id}/versions", get(bids::versions::<S>))
        .route("/{id}/submit_decision", put(bids::submit_decision::<S>))
        .route("/{id}/feedback", put(bids::submit_feedback::<S>))
}
