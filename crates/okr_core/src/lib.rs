//! Core domain logic for the OKR dashboard.
//!
//! The Progress Engine and the Objective Store are the client-side core;
//! `service`, `repo` and `db` implement the server-side collaborator.

pub mod api;
pub mod config;
pub mod db;
pub mod display;
pub mod filter;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod service;
pub mod store;

pub use api::{ApiError, ApiResult, HttpOkrApi, OkrApi};
pub use config::{ConfigError, DashboardConfig};
pub use display::{format_value, progress_label};
pub use filter::{DashboardFilters, FilterParseError, OwnerFilter, StatusFilter};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::objective::{
    KeyResult, KeyResultId, KeyResultType, NewKeyResult, NewObjective, Objective, ObjectiveId,
    ObjectiveStatus, ValidationError,
};
pub use progress::{
    derive_status, key_result_progress, objective_progress, status_breakdown, unique_owners,
    StatusBreakdown,
};
pub use repo::objective_repo::{
    ObjectiveRepository, RepoError, RepoResult, SqliteObjectiveRepository,
};
pub use service::okr_service::{OkrService, ServiceError, ServiceResult};
pub use store::mutation::{MutationKind, MutationOutcome, MutationPhase, OptimisticMutation};
pub use store::{ObjectiveStore, StoreError, StoreState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
