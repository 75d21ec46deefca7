//! Handlers for the `/bids` resource, including decisions and feedback.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tenderhub_core::bid::{Bid, BidPatch, BidStatus, BidVersion, CreateBid};
use tenderhub_core::decision::Decision;
use tenderhub_core::feedback::BidFeedback;
use tenderhub_core::store::Store;
use tenderhub_core::types::{DbId, Version};

use crate::error::AppResult;
use crate::query::{ActorParams, DecisionParams, FeedbackParams, ReviewParams, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bid lifecycle
// ---------------------------------------------------------------------------

/// POST /api/bids/new
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateBid>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Bid>>)> {
    let Json(input) = payload?;
    let bid = state.services.bids.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: bid })))
}

/// GET /api/bids/my?username=
pub async fn list_mine<S: Store>(
    State(state): State<AppState<S>>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Vec<Bid>>>> {
    let bids = state.services.bids.list_for_user(&params.username).await?;
    Ok(Json(DataResponse { data: bids }))
}

/// GET /api/bids/{tender_id}/list?username=
pub async fn list_for_tender<S: Store>(
    State(state): State<AppState<S>>,
    Path(tender_id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Vec<Bid>>>> {
    let bids = state
        .services
        .bids
        .list_for_tender(tender_id, &params.username)
        .await?;
    Ok(Json(DataResponse { data: bids }))
}

/// GET /api/bids/{id}/status?username=
pub async fn get_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<BidStatus>>> {
    let status = state.services.bids.status(id, &params.username).await?;
    Ok(Json(DataResponse { data: status }))
}

/// PUT /api/bids/{id}/status?username=&status=CANCELED
pub async fn set_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Bid>>> {
    let bid = state
        .services
        .bids
        .set_status(id, &params.username, &params.status)
        .await?;
    Ok(Json(DataResponse { data: bid }))
}

/// PATCH /api/bids/{id}/edit?username=
pub async fn edit<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
    payload: Result<Json<BidPatch>, JsonRejection>,
) -> AppResult<Json<DataResponse<Bid>>> {
    let Json(patch) = payload?;
    let bid = state.services.bids.edit(id, &params.username, patch).await?;
    Ok(Json(DataResponse { data: bid }))
}

/// PUT /api/bids/{id}/rollback/{version}?username=
pub async fn rollback<S: Store>(
    State(state): State<AppState<S>>,
    Path((id, version)): Path<(DbId, Version)>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Bid>>> {
    let bid = state
        .services
        .bids
        .rollback(id, version, &params.username)
        .await?;
    Ok(Json(DataResponse { data: bid }))
}

/// GET /api/bids/{id}/versions?username=
pub async fn versions<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Vec<BidVersion>>>> {
    let versions = state.services.bids.versions(id, &params.username).await?;
    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// Decisions and feedback
// ---------------------------------------------------------------------------

/// PUT /api/bids/{id}/submit_decision?username=&decision=Approved|Rejected
pub async fn submit_decision<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<DecisionParams>,
) -> AppResult<Json<DataResponse<Bid>>> {
    let decision = Decision::parse(&params.decision)?;
    let bid = state
        .services
        .decisions
        .submit_decision(id, &params.username, decision)
        .await?;
    Ok(Json(DataResponse { data: bid }))
}

/// PUT /api/bids/{id}/feedback?username=&bidFeedback=
pub async fn submit_feedback<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<Json<DataResponse<BidFeedback>>> {
    let feedback = state
        .services
        .bids
        .submit_feedback(id, &params.username, &params.bid_feedback)
        .await?;
    Ok(Json(DataResponse { data: feedback }))
}

/// GET /api/bids/{tender_id}/reviews?authorUsername=&requesterUsername=
pub async fn reviews<S: Store>(
    State(state): State<AppState<S>>,
    Path(tender_id): Path<DbId>,
    Query(params): Query<ReviewParams>,
) -> AppResult<Json<DataResponse<Vec<BidFeedback>>>> {
    let reviews = state
        .services
        .bids
        .reviews(tender_id, &params.author_username, &params.requester_username)
        .await?;
    Ok(Json(DataResponse { data: reviews }))
}
