//! Client-side Objective Store with optimistic remote sync.
//!
//! # Responsibility
//! - Hold the authoritative in-memory Objective collection and filter state.
//! - Apply update / set-status / delete locally before the remote call and
//!   restore the captured snapshot when the call fails.
//! - Surface fetch failures in state; log mutation failures.
//!
//! # Invariants
//! - Initial state is empty, `loading == false`, no error, filters `all`.
//! - The state lock is never held across an await point, so readers can
//!   observe optimistic state while a remote call is pending.
//! - A failed optimistic call leaves the collection exactly as it was
//!   before that call's local change.
//! - No retries and no coalescing; overlapping calls resolve
//!   last-response-wins.

pub mod mutation;

use crate::api::{ApiError, ApiResult, OkrApi};
use crate::filter::{DashboardFilters, OwnerFilter, StatusFilter};
use crate::logging::{sanitize_message, MAX_LOGGED_ERROR_CHARS};
use crate::model::objective::{NewObjective, Objective, ObjectiveId, ObjectiveStatus, ValidationError};
use crate::progress::{status_breakdown, unique_owners, StatusBreakdown};
use log::{error, info, warn};
use mutation::{MutationKind, MutationOutcome, OptimisticMutation};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

/// Observable store state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub objectives: Vec<Objective>,
    /// True while `fetch_all` is in flight.
    pub loading: bool,
    /// Message of the last failed `fetch_all`, cleared when a fetch starts.
    pub error: Option<String>,
    pub filters: DashboardFilters,
}

/// Failure of [`ObjectiveStore::create`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Input rejected locally; nothing was sent.
    Validation(ValidationError),
    Api(ApiError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid objective: {err}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Api(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ApiError> for StoreError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

/// State container for the dashboard, injected with its remote API.
pub struct ObjectiveStore<A: OkrApi> {
    api: A,
    state: Mutex<StoreState>,
}

impl<A: OkrApi> ObjectiveStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Clones the full current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.lock().clone()
    }

    pub fn objectives(&self) -> Vec<Objective> {
        self.state.lock().objectives.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn filters(&self) -> DashboardFilters {
        self.state.lock().filters.clone()
    }

    /// Looks up one objective in the local collection.
    pub fn get_by_id(&self, id: &str) -> Option<Objective> {
        self.state
            .lock()
            .objectives
            .iter()
            .find(|objective| objective.id == id)
            .cloned()
    }

    /// Objectives passing the current owner and status filters.
    pub fn visible_objectives(&self) -> Vec<Objective> {
        let state = self.state.lock();
        state
            .filters
            .apply(&state.objectives)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct owners for the owner filter, in first-seen order.
    pub fn owners(&self) -> Vec<String> {
        unique_owners(&self.state.lock().objectives)
    }

    /// Derived-status counts over the whole (unfiltered) collection.
    pub fn status_breakdown(&self) -> StatusBreakdown {
        status_breakdown(&self.state.lock().objectives)
    }

    pub fn set_owner_filter(&self, owner: impl Into<OwnerFilter>) {
        self.state.lock().filters.owner = owner.into();
    }

    pub fn set_status_filter(&self, status: impl Into<StatusFilter>) {
        self.state.lock().filters.status = status.into();
    }

    /// Replaces the collection with the remote list.
    ///
    /// On failure the previous collection is kept and the message is stored
    /// in [`StoreState::error`]. `loading` is false again in both cases.
    pub async fn fetch_all(&self) -> ApiResult<usize> {
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
        }

        let result = self.api.list_objectives().await;

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(objectives) => {
                let count = objectives.len();
                state.objectives = objectives;
                info!("event=store_fetch module=store status=ok count={count}");
                Ok(count)
            }
            Err(err) => {
                error!(
                    "event=store_fetch module=store status=error error={}",
                    sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Sends a new objective and appends the server's copy on success.
    ///
    /// Nothing is inserted before the server answers.
    pub async fn create(&self, input: NewObjective) -> Result<Objective, StoreError> {
        if let Err(err) = input.validate() {
            warn!("event=store_create module=store status=rejected error={err}");
            return Err(err.into());
        }

        match self.api.create_objective(&input).await {
            Ok(created) => {
                info!(
                    "event=store_create module=store status=ok id={}",
                    created.id
                );
                self.state.lock().objectives.push(created.clone());
                Ok(created)
            }
            Err(err) => {
                error!(
                    "event=store_create module=store status=error error={}",
                    sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                Err(err.into())
            }
        }
    }

    /// Optimistically replaces the entry with `objective.id`.
    ///
    /// On confirmation the server's copy replaces the local entry, which
    /// picks up ids assigned to new Key Results.
    pub async fn update(&self, objective: Objective) -> MutationOutcome<Objective> {
        let id = objective.id.clone();
        let replacement = objective.clone();
        let outcome = self
            .run_optimistic(
                MutationKind::Update,
                &id,
                |objectives| match objectives.iter_mut().find(|o| o.id == replacement.id) {
                    Some(slot) => {
                        *slot = replacement;
                        true
                    }
                    None => false,
                },
                self.api.update_objective(&objective),
            )
            .await;
        self.reconcile(&outcome);
        outcome
    }

    /// Optimistically changes only the status of `id`.
    pub async fn set_status(&self, id: &str, status: ObjectiveStatus) -> MutationOutcome<Objective> {
        let outcome = self
            .run_optimistic(
                MutationKind::SetStatus,
                id,
                |objectives| match objectives.iter_mut().find(|o| o.id == id) {
                    Some(objective) => {
                        objective.status = Some(status);
                        true
                    }
                    None => false,
                },
                self.api.set_objective_status(id, status),
            )
            .await;
        self.reconcile(&outcome);
        outcome
    }

    /// Optimistically removes `id`; a failure puts it back in place.
    pub async fn delete(&self, id: &str) -> MutationOutcome<ObjectiveId> {
        self.run_optimistic(
            MutationKind::Delete,
            id,
            |objectives| {
                let before = objectives.len();
                objectives.retain(|objective| objective.id != id);
                objectives.len() != before
            },
            self.api.delete_objective(id),
        )
        .await
    }

    async fn run_optimistic<T, C, F>(
        &self,
        kind: MutationKind,
        target: &str,
        change: C,
        remote: F,
    ) -> MutationOutcome<T>
    where
        C: FnOnce(&mut Vec<Objective>) -> bool,
        F: Future<Output = ApiResult<T>>,
    {
        let mutation = {
            let mut state = self.state.lock();
            OptimisticMutation::apply(kind, target, &mut state.objectives, change)
        };
        let (kind, target) = (mutation.kind(), mutation.target().to_string());
        if !mutation.touched_local_state() {
            warn!("event=store_{kind} module=store status=local_miss id={target}");
        }

        match remote.await {
            Ok(value) => {
                info!("event=store_{kind} module=store status=ok phase=confirmed id={target}");
                mutation.confirm(value)
            }
            Err(err) => {
                error!(
                    "event=store_{} module=store status=error phase=reverted id={} error={}",
                    kind,
                    target,
                    sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                let mut state = self.state.lock();
                mutation.revert(&mut state.objectives, err)
            }
        }
    }

    fn reconcile(&self, outcome: &MutationOutcome<Objective>) {
        if let MutationOutcome::Confirmed(confirmed) = outcome {
            let mut state = self.state.lock();
            if let Some(slot) = state
                .objectives
                .iter_mut()
                .find(|objective| objective.id == confirmed.id)
            {
                *slot = confirmed.clone();
            }
        }
    }
}
