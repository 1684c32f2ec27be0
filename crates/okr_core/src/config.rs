//! Process configuration for the dashboard client, CLI and server.
//!
//! # Responsibility
//! - Provide defaults, TOML file loading and `OKR_*` environment overrides.
//!
//! # Invariants
//! - Precedence is defaults < file < environment.
//! - Invalid values are rejected with the offending key, never ignored.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8787";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Base URL used by `HttpOkrApi`.
    pub api_base_url: String,
    /// Per-request client timeout. `None` waits indefinitely.
    pub request_timeout_ms: Option<u64>,
    /// Server listen address.
    pub bind_addr: String,
    /// SQLite file. `None` uses an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Insert demo objectives into an empty database at server start.
    pub seed_demo_data: bool,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_path: None,
            seed_demo_data: false,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl DashboardConfig {
    /// Loads defaults, then `path` (if given), then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|err| err.to_string())
    }

    /// Applies `OKR_*` overrides using the given variable lookup.
    ///
    /// Empty values clear optional settings.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("OKR_API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = lookup("OKR_REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = parse_optional_u64("OKR_REQUEST_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("OKR_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("OKR_DB_PATH") {
            self.db_path = optional_path(&value);
        }
        if let Some(value) = lookup("OKR_SEED_DEMO_DATA") {
            self.seed_demo_data = parse_bool("OKR_SEED_DEMO_DATA", &value)?;
        }
        if let Some(value) = lookup("OKR_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("OKR_LOG_DIR") {
            self.log_dir = optional_path(&value);
        }
        Ok(())
    }
}

fn parse_optional_u64(key: &'static str, value: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
