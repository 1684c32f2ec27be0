//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use okr_core::api::ApiEnvelope;
use okr_core::logging::{sanitize_message, MAX_LOGGED_ERROR_CHARS};
use okr_core::ServiceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServerResult<T> = Result<T, ServerError>;

/// Handler failure rendered as `{ success: false, error }`.
#[derive(Debug)]
pub enum ServerError {
    Service(ServiceError),
    /// Request body could not be decoded.
    BadRequest { status: StatusCode, message: String },
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Repo(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest { status, .. } => *status,
        }
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::BadRequest { message, .. } => write!(f, "{message}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::BadRequest { .. } => None,
        }
    }
}

impl From<ServiceError> for ServerError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let logged = sanitize_message(&message, MAX_LOGGED_ERROR_CHARS);
        if status.is_server_error() {
            error!(
                "event=http_error module=server status=error http_status={} error={}",
                status.as_u16(),
                logged
            );
        } else {
            warn!(
                "event=http_error module=server status=rejected http_status={} error={}",
                status.as_u16(),
                logged
            );
        }
        (status, Json(ApiEnvelope::<()>::failure(message))).into_response()
    }
}
