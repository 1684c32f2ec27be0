//! Objective and Key Result records.
//!
//! # Responsibility
//! - Define the Objective / Key Result shapes and their create-input forms.
//! - Provide field validation shared by client-side create and server writes.
//!
//! # Invariants
//! - A valid Objective has at least one Key Result.
//! - Key Result values are finite; their unit only matters for display.
//! - `completed` and `did-not-meet` are terminal statuses.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque Objective identifier, unique across the collection.
pub type ObjectiveId = String;

/// Opaque Key Result identifier, unique within its Objective.
pub type KeyResultId = String;

const MIN_TITLE_CHARS: usize = 3;

/// Display unit of a Key Result. Progress math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyResultType {
    Percentage,
    Numeric,
    Currency,
}

impl KeyResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::Numeric => "NUMERIC",
            Self::Currency => "CURRENCY",
        }
    }
}

impl FromStr for KeyResultType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PERCENTAGE" => Ok(Self::Percentage),
            "NUMERIC" => Ok(Self::Numeric),
            "CURRENCY" => Ok(Self::Currency),
            other => Err(format!("unknown key result type `{other}`")),
        }
    }
}

/// Objective status.
///
/// `OnTrack`, `AtRisk` and `OffTrack` are normally derived from progress;
/// `Completed` and `DidNotMeet` are manual terminal overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveStatus {
    OnTrack,
    AtRisk,
    OffTrack,
    Completed,
    DidNotMeet,
}

impl ObjectiveStatus {
    /// All statuses in display order.
    pub const ALL: [ObjectiveStatus; 5] = [
        Self::OnTrack,
        Self::AtRisk,
        Self::OffTrack,
        Self::Completed,
        Self::DidNotMeet,
    ];

    /// Returns whether this status freezes derivation from progress.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::DidNotMeet)
    }

    /// Kebab-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "on-track",
            Self::AtRisk => "at-risk",
            Self::OffTrack => "off-track",
            Self::Completed => "completed",
            Self::DidNotMeet => "did-not-meet",
        }
    }
}

impl Display for ObjectiveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectiveStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| format!("unknown objective status `{value}`"))
    }
}

/// Quantitative metric measuring progress toward an Objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    /// Server-assigned id. `None` only for Key Results added in an update
    /// request that the server has not seen yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<KeyResultId>,
    pub title: String,
    pub how_it_is_measured: String,
    /// Serialized as `type` to match the wire schema.
    #[serde(rename = "type")]
    pub kind: KeyResultType,
    pub start_value: f64,
    pub target_value: f64,
    pub current_value: f64,
}

/// Key Result create input: no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyResult {
    pub title: String,
    pub how_it_is_measured: String,
    #[serde(rename = "type")]
    pub kind: KeyResultType,
    pub start_value: f64,
    pub target_value: f64,
    pub current_value: f64,
}

impl NewKeyResult {
    /// Builds a Key Result carrying the given id.
    pub fn with_id(self, id: impl Into<KeyResultId>) -> KeyResult {
        KeyResult {
            id: Some(id.into()),
            title: self.title,
            how_it_is_measured: self.how_it_is_measured,
            kind: self.kind,
            start_value: self.start_value,
            target_value: self.target_value,
            current_value: self.current_value,
        }
    }
}

/// A tracked goal with an owner and one or more Key Results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: ObjectiveId,
    pub title: String,
    pub description: String,
    /// Free-text owner; filters match it exactly.
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_is_important: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ObjectiveStatus>,
    /// Insertion order is display order.
    pub key_results: Vec<KeyResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q2_status_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q3_status_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_status_update: Option<String>,
}

/// Objective create input: no id, no status, Key Results without ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObjective {
    pub title: String,
    pub description: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_is_important: Option<String>,
    pub key_results: Vec<NewKeyResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q2_status_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q3_status_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_status_update: Option<String>,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TitleTooShort { min_chars: usize },
    EmptyDescription,
    EmptyOwner,
    NoKeyResults,
    EmptyKeyResultTitle { index: usize },
    EmptyMeasurement { index: usize },
    NonFiniteValue { index: usize, field: &'static str },
    DuplicateKeyResultId { id: KeyResultId },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooShort { min_chars } => {
                write!(f, "title must be at least {min_chars} characters")
            }
            Self::EmptyDescription => write!(f, "description is required"),
            Self::EmptyOwner => write!(f, "owner is required"),
            Self::NoKeyResults => write!(f, "at least one key result is required"),
            Self::EmptyKeyResultTitle { index } => {
                write!(f, "key result #{index}: title is required")
            }
            Self::EmptyMeasurement { index } => {
                write!(f, "key result #{index}: howItIsMeasured is required")
            }
            Self::NonFiniteValue { index, field } => {
                write!(f, "key result #{index}: {field} must be a finite number")
            }
            Self::DuplicateKeyResultId { id } => {
                write!(f, "key result id `{id}` is used more than once")
            }
        }
    }
}

impl Error for ValidationError {}

impl Objective {
    /// Validates user-editable fields.
    ///
    /// # Errors
    /// - Returns the first violated rule, in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_header(&self.title, &self.description, &self.owner)?;
        if self.key_results.is_empty() {
            return Err(ValidationError::NoKeyResults);
        }
        for (index, kr) in self.key_results.iter().enumerate() {
            validate_key_result(
                index,
                &kr.title,
                &kr.how_it_is_measured,
                [kr.start_value, kr.target_value, kr.current_value],
            )?;
        }
        let mut seen = HashSet::new();
        for id in self.key_results.iter().filter_map(|kr| kr.id.as_deref()) {
            if !seen.insert(id) {
                return Err(ValidationError::DuplicateKeyResultId { id: id.to_string() });
            }
        }
        Ok(())
    }

    /// Returns the Key Result with the given id.
    pub fn key_result(&self, id: &str) -> Option<&KeyResult> {
        self.key_results
            .iter()
            .find(|kr| kr.id.as_deref() == Some(id))
    }
}

impl NewObjective {
    /// Validates with the same rules as [`Objective::validate`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_header(&self.title, &self.description, &self.owner)?;
        if self.key_results.is_empty() {
            return Err(ValidationError::NoKeyResults);
        }
        for (index, kr) in self.key_results.iter().enumerate() {
            validate_key_result(
                index,
                &kr.title,
                &kr.how_it_is_measured,
                [kr.start_value, kr.target_value, kr.current_value],
            )?;
        }
        Ok(())
    }
}

fn validate_header(title: &str, description: &str, owner: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::TitleTooShort {
            min_chars: MIN_TITLE_CHARS,
        });
    }
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if owner.trim().is_empty() {
        return Err(ValidationError::EmptyOwner);
    }
    Ok(())
}

fn validate_key_result(
    index: usize,
    title: &str,
    how_it_is_measured: &str,
    values: [f64; 3],
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyKeyResultTitle { index });
    }
    if how_it_is_measured.trim().is_empty() {
        return Err(ValidationError::EmptyMeasurement { index });
    }
    let fields = ["startValue", "targetValue", "currentValue"];
    for (value, field) in values.into_iter().zip(fields) {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { index, field });
        }
    }
    Ok(())
}
