//! Command definitions and execution.

use crate::error::CliError;
use crate::render;
use clap::{Parser, Subcommand};
use log::info;
use okr_core::{
    DashboardConfig, MutationKind, MutationOutcome, NewObjective, Objective, ObjectiveStatus,
    ObjectiveStore, OkrApi, OwnerFilter, StatusFilter,
};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

/// OKR dashboard on the command line.
#[derive(Debug, Parser)]
#[command(name = "okr", version, about)]
pub struct Cli {
    /// Server base URL; overrides `api_base_url`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// TOML config file; `OKR_*` variables override it.
    #[arg(long, global = true, env = "OKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at the configured level instead of `warn`.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List objectives with derived status and progress.
    List {
        /// Exact owner name, or `all`.
        #[arg(long, default_value = "all")]
        owner: String,
        /// Derived status (`on-track`, `at-risk`, ...), or `all`.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Show one objective with its Key Results.
    Show { id: String },
    /// Count objectives per derived status.
    Summary,
    /// Create an objective from a JSON file.
    Create {
        /// Body with `title`, `description`, `owner` and `keyResults`.
        #[arg(long)]
        from: PathBuf,
    },
    /// Replace an objective, or move Key Result current values.
    Update {
        id: String,
        /// JSON file with the full replacement; its `id` is ignored.
        #[arg(long, required_unless_present = "current")]
        from: Option<PathBuf>,
        /// New current value for one Key Result, as `KR_ID=VALUE`.
        #[arg(long, value_name = "KR_ID=VALUE", value_parser = parse_current_value)]
        current: Vec<(String, f64)>,
    },
    /// Set the stored status of an objective.
    SetStatus { id: String, status: ObjectiveStatus },
    /// Delete an objective.
    Delete { id: String },
}

impl Cli {
    /// Resolves config from file, environment and flags.
    pub fn resolve_config(&self) -> Result<DashboardConfig, CliError> {
        let mut config = DashboardConfig::load(self.config.as_deref())?;
        if let Some(base_url) = &self.base_url {
            config.api_base_url = base_url.clone();
        }
        Ok(config)
    }
}

/// Runs `command` against `store`, writing human-readable output to `out`.
///
/// The store is fetched first; mutations then go through the optimistic path.
pub async fn execute<A, W>(
    command: &Command,
    store: &ObjectiveStore<A>,
    out: &mut W,
) -> Result<(), CliError>
where
    A: OkrApi,
    W: Write,
{
    let count = store.fetch_all().await?;
    info!("event=cli_fetch module=cli status=ok count={count}");

    match command {
        Command::List { owner, status } => {
            store.set_owner_filter(OwnerFilter::from(owner.as_str()));
            store.set_status_filter(*status);
            write!(out, "{}", render::objective_table(&store.visible_objectives()))?;
        }
        Command::Show { id } => {
            let objective = store
                .get_by_id(id)
                .ok_or_else(|| CliError::NotFound(id.clone()))?;
            write!(out, "{}", render::objective_detail(&objective))?;
        }
        Command::Summary => {
            write!(
                out,
                "{}",
                render::summary(&store.status_breakdown(), &store.owners())
            )?;
        }
        Command::Create { from } => {
            let input: NewObjective = serde_json::from_value(read_json(from)?)
                .map_err(|err| CliError::input(from, err))?;
            let created = store.create(input).await?;
            write!(out, "{}", render::objective_detail(&created))?;
        }
        Command::Update { id, from, current } => {
            let mut objective = match from {
                Some(path) => replacement_from_file(path, id)?,
                None => store
                    .get_by_id(id)
                    .ok_or_else(|| CliError::NotFound(id.clone()))?,
            };
            for (key_result, value) in current {
                let slot = objective
                    .key_results
                    .iter_mut()
                    .find(|kr| kr.id.as_deref() == Some(key_result.as_str()))
                    .ok_or_else(|| CliError::UnknownKeyResult {
                        objective: id.clone(),
                        key_result: key_result.clone(),
                    })?;
                slot.current_value = *value;
            }
            objective.validate()?;

            let outcome = store.update(objective).await;
            let updated = confirmed(outcome, MutationKind::Update, id)?;
            write!(out, "{}", render::objective_detail(&updated))?;
        }
        Command::SetStatus { id, status } => {
            let outcome = store.set_status(id, *status).await;
            let updated = confirmed(outcome, MutationKind::SetStatus, id)?;
            writeln!(out, "{}", render::objective_row(&updated))?;
        }
        Command::Delete { id } => {
            let outcome = store.delete(id).await;
            let deleted = confirmed(outcome, MutationKind::Delete, id)?;
            writeln!(out, "deleted {deleted}")?;
        }
    }
    Ok(())
}

fn confirmed<T>(
    outcome: MutationOutcome<T>,
    kind: MutationKind,
    id: &str,
) -> Result<T, CliError> {
    match outcome {
        MutationOutcome::Confirmed(value) => Ok(value),
        MutationOutcome::Reverted(error) => Err(CliError::Reverted {
            kind,
            id: id.to_string(),
            error,
        }),
    }
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|err| CliError::input(path, err))?;
    serde_json::from_str(&raw).map_err(|err| CliError::input(path, err))
}

/// Reads a replacement objective, forcing its id to `id`.
fn replacement_from_file(path: &Path, id: &str) -> Result<Objective, CliError> {
    let mut value = read_json(path)?;
    match value.as_object_mut() {
        Some(fields) => {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }
        None => return Err(CliError::input(path, "expected a JSON object")),
    }
    serde_json::from_value(value).map_err(|err| CliError::input(path, err))
}

/// Parses `KR_ID=VALUE` for `update --current`.
fn parse_current_value(raw: &str) -> Result<(String, f64), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KR_ID=VALUE, got `{raw}`"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err("key result id is empty".to_string());
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !value.is_finite() {
        return Err(format!("`{value}` is not a finite number"));
    }
    Ok((id.to_string(), value))
}
