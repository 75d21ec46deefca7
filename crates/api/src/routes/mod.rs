pub mod bids;
pub mod health;
pub mod tenders;

use axum::routing::get;
use axum::Router;
use tenderhub_core::store::Store;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ping                                   liveness
///
/// /tenders                                list all
/// /tenders/new                            create (POST)
/// /tenders/my                             tenders created by ?username
/// /tenders/{id}/status                    get, set (PUT ?status=publish|close)
/// /tenders/{id}/edit                      partial update (PATCH)
/// /tenders/{id}/rollback/{version}        restore snapshot (PUT)
/// /tenders/{id}/versions                  snapshot history
///
/// /bids/new                               create (POST)
/// /bids/my                                bids authored by ?username
/// /bids/{tender_id}/list                  bids of a tender
/// /bids/{tender_id}/reviews               feedback on an author's bids
/// /bids/{id}/status                       get, set (PUT ?status=CANCELED)
/// /bids/{id}/edit                         partial update (PATCH)
/// /bids/{id}/rollback/{version}           restore snapshot (PUT)
/// /bids/{id}/versions                     snapshot history
/// /bids/{id}/submit_decision              vote (PUT ?decision=)
/// /bids/{id}/feedback                     reviewer feedback (PUT)
/// ```
pub fn api_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/ping", get(handlers::health::ping))
        .nest("/tenders", tenders::router())
        .nest("/bids", bids::router())
}
