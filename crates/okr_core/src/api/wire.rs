//! JSON envelopes shared by the HTTP client and server.

use crate::api::{ApiError, ApiResult};
use crate::model::objective::{ObjectiveId, ObjectiveStatus};
use serde::{Deserialize, Serialize};

/// `{ success, data }` on success, `{ success: false, error }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Unwraps `data` from a successful envelope.
    ///
    /// # Errors
    /// - `success == false` or missing `data` is reported as `ApiError::Decode`.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::Decode(format!(
                "envelope reported failure: {}",
                self.error.as_deref().unwrap_or("no error message")
            )));
        }
        self.data
            .ok_or_else(|| ApiError::Decode("envelope is missing `data`".to_string()))
    }
}

/// `PATCH /api/okrs/:id/status` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: ObjectiveStatus,
}

/// `DELETE /api/okrs/:id` response data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedObjective {
    pub id: ObjectiveId,
}
