//! Optimistic mutation state machine.
//!
//! Each optimistic store call moves `Applied -> Confirmed | Reverted`
//! exactly once. The transition consumes the [`OptimisticMutation`], so a
//! mutation cannot be settled twice.

use crate::api::ApiError;
use crate::model::objective::{Objective, ObjectiveId};
use std::fmt::{Display, Formatter};

/// Kind of optimistic store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Update,
    SetStatus,
    Delete,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::SetStatus => "set_status",
            Self::Delete => "delete",
        }
    }
}

impl Display for MutationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settled phase of an optimistic call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Confirmed,
    Reverted,
}

/// Final state of one optimistic call.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    /// Remote call succeeded; carries the server's answer.
    Confirmed(T),
    /// Remote call failed; the pre-mutation snapshot was restored.
    Reverted(ApiError),
}

impl<T> MutationOutcome<T> {
    pub fn phase(&self) -> MutationPhase {
        match self {
            Self::Confirmed(_) => MutationPhase::Confirmed,
            Self::Reverted(_) => MutationPhase::Reverted,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Confirmed(_) => None,
            Self::Reverted(err) => Some(err),
        }
    }

    /// Converts into a `Result`, dropping the phase distinction.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Confirmed(value) => Ok(value),
            Self::Reverted(err) => Err(err),
        }
    }
}

/// A local change applied ahead of remote confirmation.
#[must_use = "an applied mutation must be confirmed or reverted"]
#[derive(Debug)]
pub struct OptimisticMutation {
    kind: MutationKind,
    target: ObjectiveId,
    snapshot: Vec<Objective>,
    touched: bool,
}

impl OptimisticMutation {
    /// Captures `objectives` verbatim, then runs `change` on it.
    ///
    /// `change` returns whether it found and modified the target.
    pub fn apply<F>(
        kind: MutationKind,
        target: impl Into<ObjectiveId>,
        objectives: &mut Vec<Objective>,
        change: F,
    ) -> Self
    where
        F: FnOnce(&mut Vec<Objective>) -> bool,
    {
        let snapshot = objectives.clone();
        let touched = change(objectives);
        Self {
            kind,
            target: target.into(),
            snapshot,
            touched,
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the local collection actually contained the target.
    pub fn touched_local_state(&self) -> bool {
        self.touched
    }

    /// Settles as confirmed; the snapshot is discarded.
    pub fn confirm<T>(self, value: T) -> MutationOutcome<T> {
        MutationOutcome::Confirmed(value)
    }

    /// Settles as reverted, restoring the snapshot into `objectives`.
    pub fn revert<T>(self, objectives: &mut Vec<Objective>, error: ApiError) -> MutationOutcome<T> {
        *objectives = self.snapshot;
        MutationOutcome::Reverted(error)
    }
}
