//! Remote OKR API contract used by the Objective Store.
//!
//! # Responsibility
//! - Define the async CRUD contract between the store and the remote backend.
//! - Define the single client-side error kind (network or server failure).
//!
//! # Invariants
//! - Implementations never retry; one call is one request.
//! - Any non-2xx response, transport failure or undecodable body is an error.

use crate::model::objective::{NewObjective, Objective, ObjectiveId, ObjectiveStatus};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod http;
pub mod wire;

pub use http::HttpOkrApi;
pub use wire::{ApiEnvelope, DeletedObjective, StatusPatch};

pub type ApiResult<T> = Result<T, ApiError>;

/// Network or server failure surfaced by an [`OkrApi`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request never produced a response (connect, DNS, timeout, I/O).
    Transport(String),
    /// Server answered with a non-2xx status.
    Status { status: u16, message: String },
    /// A 2xx response body did not match the `{ success, data }` envelope.
    Decode(String),
    /// Base URL cannot be used to build endpoint URLs.
    InvalidUrl(String),
}

impl ApiError {
    /// Returns whether the server reported the target as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Status { status, message } => write!(f, "server returned {status}: {message}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
            Self::InvalidUrl(message) => write!(f, "invalid base url: {message}"),
        }
    }
}

impl Error for ApiError {}

/// Async CRUD contract over the remote Objective collection.
#[async_trait]
pub trait OkrApi: Send + Sync {
    /// `GET /api/okrs`
    async fn list_objectives(&self) -> ApiResult<Vec<Objective>>;
    /// `POST /api/okrs`; the server assigns ids and default status.
    async fn create_objective(&self, input: &NewObjective) -> ApiResult<Objective>;
    /// `PUT /api/okrs/:id` with the full replacement.
    async fn update_objective(&self, objective: &Objective) -> ApiResult<Objective>;
    /// `PATCH /api/okrs/:id/status`
    async fn set_objective_status(
        &self,
        id: &str,
        status: ObjectiveStatus,
    ) -> ApiResult<Objective>;
    /// `DELETE /api/okrs/:id`; returns the deleted id.
    async fn delete_objective(&self, id: &str) -> ApiResult<ObjectiveId>;
}

#[async_trait]
impl<T: OkrApi + ?Sized> OkrApi for Arc<T> {
    async fn list_objectives(&self) -> ApiResult<Vec<Objective>> {
        (**self).list_objectives().await
    }

    async fn create_objective(&self, input: &NewObjective) -> ApiResult<Objective> {
        (**self).create_objective(input).await
    }

    async fn update_objective(&self, objective: &Objective) -> ApiResult<Objective> {
        (**self).update_objective(objective).await
    }

    async fn set_objective_status(
        &self,
        id: &str,
        status: ObjectiveStatus,
    ) -> ApiResult<Objective> {
        (**self).set_objective_status(id, status).await
    }

    async fn delete_objective(&self, id: &str) -> ApiResult<ObjectiveId> {
        (**self).delete_objective(id).await
    }
}
