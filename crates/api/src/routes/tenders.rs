//! Route definitions for the `/tenders` resource.
//!
//! ```text
//! GET    /                          list
//! POST   /new                       create
//! GET    /my                        list_mine
//! GET    /{id}/status               get_status
//! PUT    /{id}/status               set_status
//! PATCH  /{id}/edit                 edit
//! PUT    /{id}/rollback/{version}   rollback
//! GET    /{id}/versions             versions
//! ```

use axum::routing::{get, patch, post, put};
use axum::Router;
use tenderhub_core::store::Store;

use crate::handlers::tenders;
use crate::state::AppState;

pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(tenders::list::<S>))
        .route("/new", post(tenders::create::<S>))
        .route("/my", get(tenders::list_mine::<S>))
        .route(
            "/{id}/status",
            get(tenders::get_status::<S>).put(tenders::set_status::<S>),
        )
        .route("/{id}/edit", patch(tenders::edit::<S>))
        .route("/{id}/rollback/{version}", put(tenders::rollback::<S>))
        .route("/{id}/versions", get(tenders::versions::<S>))
}
