//! `/api/okrs` handlers.

use crate::{AppState, ServerResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use okr_core::api::{ApiEnvelope, DeletedObjective, StatusPatch};
use okr_core::{NewObjective, Objective};

type Envelope<T> = Json<ApiEnvelope<T>>;

pub(crate) async fn list_objectives(
    State(state): State<AppState>,
) -> ServerResult<Envelope<Vec<Objective>>> {
    let objectives = state.with_service(|service| service.list())?;
    Ok(Json(ApiEnvelope::ok(objectives)))
}

pub(crate) async fn create_objective(
    State(state): State<AppState>,
    payload: Result<Json<NewObjective>, JsonRejection>,
) -> ServerResult<(StatusCode, Envelope<Objective>)> {
    let Json(input) = payload?;
    let created = state.with_service(|service| service.create(input))?;
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(created))))
}

pub(crate) async fn update_objective(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Objective>, JsonRejection>,
) -> ServerResult<Envelope<Objective>> {
    let Json(replacement) = payload?;
    let updated = state.with_service(|service| service.update(&id, replacement))?;
    Ok(Json(ApiEnvelope::ok(updated)))
}

pub(crate) async fn set_objective_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusPatch>, JsonRejection>,
) -> ServerResult<Envelope<Objective>> {
    let Json(StatusPatch { status }) = payload?;
    let updated = state.with_service(|service| service.set_status(&id, status))?;
    Ok(Json(ApiEnvelope::ok(updated)))
}

pub(crate) async fn delete_objective(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Envelope<DeletedObjective>> {
    let id = state.with_service(|service| service.delete(&id))?;
    Ok(Json(ApiEnvelope::ok(DeletedObjective { id })))
}
