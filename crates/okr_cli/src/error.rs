//! CLI error type and its process exit code mapping.

use okr_core::{
    ApiError, ConfigError, KeyResultId, MutationKind, ObjectiveId, StoreError, ValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(String),
    Api(ApiError),
    NotFound(ObjectiveId),
    /// JSON input file is unreadable or does not describe an objective.
    Input {
        path: PathBuf,
        message: String,
    },
    /// Objective was rejected locally; nothing was sent.
    Validation(ValidationError),
    UnknownKeyResult {
        objective: ObjectiveId,
        key_result: KeyResultId,
    },
    /// Optimistic change was rolled back after the server refused it.
    Reverted {
        kind: MutationKind,
        id: ObjectiveId,
        error: ApiError,
    },
    Io(std::io::Error),
}

impl CliError {
    pub fn input(path: &Path, err: impl Display) -> Self {
        Self::Input {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Logging(_) => 2,
            Self::Api(_)
            | Self::NotFound(_)
            | Self::Input { .. }
            | Self::Validation(_)
            | Self::UnknownKeyResult { .. }
            | Self::Reverted { .. }
            | Self::Io(_) => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Api(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "objective `{id}` not found"),
            Self::Input { path, message } => {
                write!(f, "cannot use `{}`: {message}", path.display())
            }
            Self::Validation(err) => write!(f, "invalid objective: {err}"),
            Self::UnknownKeyResult {
                objective,
                key_result,
            } => write!(f, "objective `{objective}` has no key result `{key_result}`"),
            Self::Reverted { kind, id, error } => {
                write!(f, "{kind} of `{id}` was reverted: {error}")
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Api(err) | Self::Reverted { error: err, .. } => Some(err),
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Logging(_)
            | Self::NotFound(_)
            | Self::Input { .. }
            | Self::UnknownKeyResult { .. } => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ApiError> for CliError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::Api(err) => Self::Api(err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
