//! Server-side OKR use-case service.
//!
//! # Responsibility
//! - Implement the REST surface semantics: id assignment, default status,
//!   Key Result id preservation, not-found reporting.
//! - Delegate persistence to an [`ObjectiveRepository`].
//!
//! # Invariants
//! - New Objectives and Key Results get fresh UUID v4 ids.
//! - Updates keep existing Key Result ids; only id-less ones get new ids.
//! - Service layer remains storage-agnostic.

use crate::model::objective::{NewObjective, Objective, ObjectiveId, ObjectiveStatus, ValidationError};
use crate::repo::objective_repo::{ObjectiveRepository, RepoError};
use crate::service::seed::demo_objectives;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Status given to newly created objectives.
pub const DEFAULT_STATUS: ObjectiveStatus = ObjectiveStatus::OnTrack;

/// Service error for OKR use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound(ObjectiveId),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(_) => write!(f, "Objective not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// OKR service facade over a repository implementation.
pub struct OkrService<R: ObjectiveRepository> {
    repo: R,
}

impl<R: ObjectiveRepository> OkrService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists all objectives in creation order.
    pub fn list(&self) -> ServiceResult<Vec<Objective>> {
        Ok(self.repo.list_objectives()?)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Objective> {
        self.repo
            .get_objective(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Creates an objective with fresh ids and status `on-track`.
    pub fn create(&mut self, input: NewObjective) -> ServiceResult<Objective> {
        input.validate()?;

        let objective = Objective {
            id: new_id(),
            title: input.title,
            description: input.description,
            owner: input.owner,
            why_is_important: input.why_is_important,
            status: Some(DEFAULT_STATUS),
            key_results: input
                .key_results
                .into_iter()
                .map(|kr| kr.with_id(new_id()))
                .collect(),
            q2_status_update: input.q2_status_update,
            q3_status_update: input.q3_status_update,
            final_status_update: input.final_status_update,
        };
        self.repo.insert_objective(&objective)?;

        info!(
            "event=objective_create module=service status=ok id={} key_results={}",
            objective.id,
            objective.key_results.len()
        );
        Ok(objective)
    }

    /// Fully replaces the objective stored under `id`.
    ///
    /// # Contract
    /// - `id` wins over `replacement.id`.
    /// - Key Results without an id receive a fresh one.
    /// - An absent `status` keeps the stored status.
    pub fn update(&mut self, id: &str, replacement: Objective) -> ServiceResult<Objective> {
        let existing = self.get(id)?;

        let mut updated = replacement;
        updated.id = existing.id;
        updated.status = updated.status.or(existing.status);
        for kr in &mut updated.key_results {
            if kr.id.as_deref().map_or(true, |kr_id| kr_id.trim().is_empty()) {
                kr.id = Some(new_id());
            }
        }
        self.repo.replace_objective(&updated)?;

        info!(
            "event=objective_update module=service status=ok id={} key_results={}",
            updated.id,
            updated.key_results.len()
        );
        Ok(updated)
    }

    /// Changes only the stored status.
    pub fn set_status(&mut self, id: &str, status: ObjectiveStatus) -> ServiceResult<Objective> {
        self.repo.set_status(id, status)?;
        info!("event=objective_set_status module=service status=ok id={id} new_status={status}");
        self.get(id)
    }

    /// Hard-deletes an objective and returns its id.
    pub fn delete(&mut self, id: &str) -> ServiceResult<ObjectiveId> {
        self.repo.delete_objective(id)?;
        info!("event=objective_delete module=service status=ok id={id}");
        Ok(id.to_string())
    }

    /// Inserts the demo objectives when the collection is empty.
    ///
    /// Returns the number of inserted objectives.
    pub fn seed_if_empty(&mut self) -> ServiceResult<usize> {
        if self.repo.count_objectives()? > 0 {
            return Ok(0);
        }
        let seeded = demo_objectives();
        for objective in &seeded {
            self.repo.insert_objective(objective)?;
        }
        info!(
            "event=seed module=service status=ok inserted={}",
            seeded.len()
        );
        Ok(seeded.len())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
