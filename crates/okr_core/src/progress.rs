//! Progress Engine: Key Result completion, Objective progress and status.
//!
//! # Responsibility
//! - Map raw Key Result values to a completion percentage.
//! - Aggregate Key Result progress into Objective progress.
//! - Derive a categorical status, honoring manual terminal overrides.
//!
//! # Invariants
//! - Every percentage returned here lies in `[0, 100]`.
//! - `completed` / `did-not-meet` are never recomputed from progress.
//! - All functions are pure and stateless.

use crate::model::objective::{KeyResult, Objective, ObjectiveStatus};

/// Objective progress at or above this value is `on-track`.
pub const ON_TRACK_THRESHOLD: f64 = 70.0;
/// Objective progress at or above this value (and below on-track) is `at-risk`.
pub const AT_RISK_THRESHOLD: f64 = 30.0;

/// Computes one Key Result's completion percentage.
///
/// Rules:
/// - `target == start`: 0 (degenerate range).
/// - `start > target`: decreasing metric, measured as distance travelled
///   down from `start`.
/// - otherwise: increasing metric, measured up from `start`.
/// - Result is clamped to `[0, 100]`; non-finite input yields 0.
pub fn key_result_progress(kr: &KeyResult) -> f64 {
    let (start, target, current) = (kr.start_value, kr.target_value, kr.current_value);
    if target == start {
        return 0.0;
    }

    let raw = if start > target {
        (start - current) / (start - target) * 100.0
    } else {
        (current - start) / (target - start) * 100.0
    };

    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}

/// Computes the unweighted mean of Key Result progress.
///
/// Returns 0 when the Objective has no Key Results.
pub fn objective_progress(objective: &Objective) -> f64 {
    if objective.key_results.is_empty() {
        return 0.0;
    }
    let total: f64 = objective.key_results.iter().map(key_result_progress).sum();
    total / objective.key_results.len() as f64
}

/// Derives the status shown for an Objective.
///
/// A stored terminal status is returned unchanged. Any other stored status
/// is ignored in favor of live recomputation from [`objective_progress`].
pub fn derive_status(objective: &Objective) -> ObjectiveStatus {
    if let Some(status) = objective.status.filter(|status| status.is_terminal()) {
        return status;
    }
    status_for_progress(objective_progress(objective))
}

/// Maps a progress percentage to an in-progress status.
pub fn status_for_progress(progress: f64) -> ObjectiveStatus {
    if progress >= ON_TRACK_THRESHOLD {
        ObjectiveStatus::OnTrack
    } else if progress >= AT_RISK_THRESHOLD {
        ObjectiveStatus::AtRisk
    } else {
        ObjectiveStatus::OffTrack
    }
}

/// Count of objectives per derived status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    counts: [usize; ObjectiveStatus::ALL.len()],
}

impl StatusBreakdown {
    pub fn count(&self, status: ObjectiveStatus) -> usize {
        self.counts[slot(status)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Yields every status with its count, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectiveStatus, usize)> + '_ {
        ObjectiveStatus::ALL
            .into_iter()
            .map(|status| (status, self.count(status)))
    }
}

/// Tallies derived statuses across a collection.
pub fn status_breakdown<'a>(objectives: impl IntoIterator<Item = &'a Objective>) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for objective in objectives {
        breakdown.counts[slot(derive_status(objective))] += 1;
    }
    breakdown
}

/// Distinct owners in first-seen order.
pub fn unique_owners<'a>(objectives: impl IntoIterator<Item = &'a Objective>) -> Vec<String> {
    let mut owners: Vec<String> = Vec::new();
    for objective in objectives {
        if !owners.iter().any(|owner| owner == &objective.owner) {
            owners.push(objective.owner.clone());
        }
    }
    owners
}

fn slot(status: ObjectiveStatus) -> usize {
    match status {
        ObjectiveStatus::OnTrack => 0,
        ObjectiveStatus::AtRisk => 1,
        ObjectiveStatus::OffTrack => 2,
        ObjectiveStatus::Completed => 3,
        ObjectiveStatus::DidNotMeet => 4,
    }
}
