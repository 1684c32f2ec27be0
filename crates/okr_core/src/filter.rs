//! Dashboard filters over the Objective collection.
//!
//! # Invariants
//! - Both filters default to `All`.
//! - The status filter compares against the derived status, not the stored one.

use crate::model::objective::{Objective, ObjectiveStatus};
use crate::progress::derive_status;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const ALL: &str = "all";

/// Owner predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OwnerFilter {
    #[default]
    All,
    /// Exact owner match.
    Owner(String),
}

impl OwnerFilter {
    pub fn matches(&self, objective: &Objective) -> bool {
        match self {
            Self::All => true,
            Self::Owner(owner) => &objective.owner == owner,
        }
    }
}

impl From<&str> for OwnerFilter {
    fn from(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Owner(value.to_string())
        }
    }
}

impl From<String> for OwnerFilter {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Owner(value)
        }
    }
}

impl Display for OwnerFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Owner(owner) => f.write_str(owner),
        }
    }
}

/// Derived-status predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ObjectiveStatus),
}

impl StatusFilter {
    pub fn matches(&self, objective: &Objective) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => derive_status(objective) == *status,
        }
    }
}

impl From<ObjectiveStatus> for StatusFilter {
    fn from(value: ObjectiveStatus) -> Self {
        Self::Only(value)
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Status filter text that is neither `all` nor a known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown status filter `{}`; expected all|on-track|at-risk|off-track|completed|did-not-meet",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed == ALL {
            return Ok(Self::All);
        }
        trimmed
            .parse::<ObjectiveStatus>()
            .map(Self::Only)
            .map_err(|_| FilterParseError(trimmed.to_string()))
    }
}

/// Owner and status filter pair held by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilters {
    pub owner: OwnerFilter,
    pub status: StatusFilter,
}

impl DashboardFilters {
    /// Returns whether an objective passes both predicates.
    pub fn matches(&self, objective: &Objective) -> bool {
        self.owner.matches(objective) && self.status.matches(objective)
    }

    /// Returns the matching objectives in collection order.
    pub fn apply<'a>(&self, objectives: &'a [Objective]) -> Vec<&'a Objective> {
        objectives
            .iter()
            .filter(|objective| self.matches(objective))
            .collect()
    }
}
