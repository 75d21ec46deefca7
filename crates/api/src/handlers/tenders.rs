//! Handlers for the `/tenders` resource.
//!
//! Every handler delegates to [`TenderLifecycle`](tenderhub_lifecycle::TenderLifecycle);
//! authorization and status rules live there.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tenderhub_core::store::Store;
use tenderhub_core::tender::{
    CreateTender, Tender, TenderAction, TenderPatch, TenderStatus, TenderVersion,
};
use tenderhub_core::types::{DbId, Version};

use crate::error::AppResult;
use crate::query::{ActorParams, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/tenders
pub async fn list<S: Store>(
    State(state): State<AppState<S>>,
) -> AppResult<Json<DataResponse<Vec<Tender>>>> {
    let tenders = state.services.tenders.list().await?;
    Ok(Json(DataResponse { data: tenders }))
}

/// POST /api/tenders/new
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTender>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Tender>>)> {
    let Json(input) = payload?;
    let tender = state.services.tenders.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: tender })))
}

/// GET /api/tenders/my?username=
pub async fn list_mine<S: Store>(
    State(state): State<AppState<S>>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Vec<Tender>>>> {
    let tenders = state.services.tenders.list_for_user(&params.username).await?;
    Ok(Json(DataResponse { data: tenders }))
}

/// GET /api/tenders/{id}/status?username=
pub async fn get_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<TenderStatus>>> {
    let status = state.services.tenders.status(id, &params.username).await?;
    Ok(Json(DataResponse { data: status }))
}

/// PUT /api/tenders/{id}/status?username=&status=publish|close
pub async fn set_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Tender>>> {
    let action = TenderAction::parse(&params.status)?;
    let tender = state
        .services
        .tenders
        .set_status(id, &params.username, action)
        .await?;
    Ok(Json(DataResponse { data: tender }))
}

/// PATCH /api/tenders/{id}/edit?username=
pub async fn edit<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
    payload: Result<Json<TenderPatch>, JsonRejection>,
) -> AppResult<Json<DataResponse<Tender>>> {
    let Json(patch) = payload?;
    let tender = state.services.tenders.edit(id, &params.username, patch).await?;
    Ok(Json(DataResponse { data: tender }))
}

/// PUT /api/tenders/{id}/rollback/{version}?username=
pub async fn rollback<S: Store>(
    State(state): State<AppState<S>>,
    Path((id, version)): Path<(DbId, Version)>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Tender>>> {
    let tender = state
        .services
        .tenders
        .rollback(id, version, &params.username)
        .await?;
    Ok(Json(DataResponse { data: tender }))
}

/// GET /api/tenders/{id}/versions?username=
pub async fn versions<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Vec<TenderVersion>>>> {
    let versions = state.services.tenders.versions(id, &params.username).await?;
    Ok(Json(DataResponse { data: versions }))
}
