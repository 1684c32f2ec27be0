//! reqwest-backed [`OkrApi`] implementation.
//!
//! # Responsibility
//! - Translate store calls into JSON-over-HTTP requests against `/api/okrs`.
//! - Map transport, status and decoding failures onto [`ApiError`].
//!
//! # Invariants
//! - No request timeout unless one is configured.
//! - Object ids are percent-encoded as single path segments.

use crate::api::wire::{ApiEnvelope, DeletedObjective, StatusPatch};
use crate::api::{ApiError, ApiResult, OkrApi};
use crate::config::DashboardConfig;
use crate::model::objective::{NewObjective, Objective, ObjectiveId, ObjectiveStatus};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

const OKRS_PATH: [&str; 2] = ["api", "okrs"];

/// HTTP client for the OKR REST surface.
#[derive(Debug, Clone)]
pub struct HttpOkrApi {
    client: Client,
    base_url: Url,
}

impl HttpOkrApi {
    /// Creates a client without a request timeout.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client with an optional per-request timeout.
    ///
    /// # Errors
    /// - `ApiError::InvalidUrl` when `base_url` does not parse or cannot
    ///   carry a path.
    /// - `ApiError::Transport` when the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| ApiError::InvalidUrl(format!("`{base_url}`: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "`{base_url}` cannot be used as a base"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Creates a client from `api_base_url` / `request_timeout_ms`.
    pub fn from_config(config: &DashboardConfig) -> ApiResult<Self> {
        Self::with_timeout(
            &config.api_base_url,
            config.request_timeout_ms.map(Duration::from_millis),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, extra: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("`{}` cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(OKRS_PATH)
            .extend(extra);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, op: &str, request: RequestBuilder) -> ApiResult<T> {
        let started_at = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        debug!(
            "event=api_call module=api op={} http_status={} duration_ms={}",
            op,
            status.as_u16(),
            started_at.elapsed().as_millis()
        );

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<ApiEnvelope<T>>(&body)
            .map_err(|err| ApiError::Decode(err.to_string()))?
            .into_data()
    }
}

#[async_trait]
impl OkrApi for HttpOkrApi {
    async fn list_objectives(&self) -> ApiResult<Vec<Objective>> {
        let url = self.endpoint(&[])?;
        self.send("list", self.client.get(url)).await
    }

    async fn create_objective(&self, input: &NewObjective) -> ApiResult<Objective> {
        let url = self.endpoint(&[])?;
        self.send("create", self.client.post(url).json(input)).await
    }

    async fn update_objective(&self, objective: &Objective) -> ApiResult<Objective> {
        let url = self.endpoint(&[objective.id.as_str()])?;
        self.send("update", self.client.put(url).json(objective))
            .await
    }

    async fn set_objective_status(
        &self,
        id: &str,
        status: ObjectiveStatus,
    ) -> ApiResult<Objective> {
        let url = self.endpoint(&[id, "status"])?;
        self.send("set_status", self.client.patch(url).json(&StatusPatch { status }))
            .await
    }

    async fn delete_objective(&self, id: &str) -> ApiResult<ObjectiveId> {
        let url = self.endpoint(&[id])?;
        let deleted: DeletedObjective = self.send("delete", self.client.delete(url)).await?;
        Ok(deleted.id)
    }
}
