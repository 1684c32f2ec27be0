//! Objective repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `objectives` / `key_results` tables.
//! - Keep collection order (creation order) and Key Result order stable.
//!
//! # Invariants
//! - Write paths call `Objective::validate()` and require every Key Result
//!   to carry an id.
//! - Key Result replacement happens in the same transaction as the header
//!   update.
//! - Read paths reject rows with unknown enum values instead of masking them.

use crate::db::DbError;
use crate::model::objective::{
    KeyResult, KeyResultType, Objective, ObjectiveId, ObjectiveStatus, ValidationError,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const OBJECTIVE_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    owner,
    why_is_important,
    status,
    q2_status_update,
    q3_status_update,
    final_status_update
FROM objectives";

const KEY_RESULT_SELECT_SQL: &str = "SELECT
    objective_id,
    id,
    title,
    how_it_is_measured,
    kind,
    start_value,
    target_value,
    current_value
FROM key_results";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for objective persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(ObjectiveId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "objective not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid objective data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the server-side Objective collection.
pub trait ObjectiveRepository {
    /// Appends a new objective at the end of the collection.
    fn insert_objective(&mut self, objective: &Objective) -> RepoResult<()>;
    /// Replaces an objective in place, keeping its collection position.
    fn replace_objective(&mut self, objective: &Objective) -> RepoResult<()>;
    /// Changes only the stored status.
    fn set_status(&mut self, id: &str, status: ObjectiveStatus) -> RepoResult<()>;
    /// Hard-deletes an objective and its Key Results.
    fn delete_objective(&mut self, id: &str) -> RepoResult<()>;
    fn get_objective(&self, id: &str) -> RepoResult<Option<Objective>>;
    /// Lists all objectives in collection order.
    fn list_objectives(&self) -> RepoResult<Vec<Objective>>;
    fn count_objectives(&self) -> RepoResult<usize>;
}

/// SQLite-backed objective repository owning its connection.
pub struct SqliteObjectiveRepository {
    conn: Connection,
}

impl SqliteObjectiveRepository {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `InvalidData` when the schema is missing the `objectives` table.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'objectives'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::InvalidData(
                "connection is not migrated: missing `objectives` table".to_string(),
            ));
        }
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ObjectiveRepository for SqliteObjectiveRepository {
    fn insert_objective(&mut self, objective: &Objective) -> RepoResult<()> {
        ensure_writable(objective)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO objectives (
                id,
                position,
                title,
                description,
                owner,
                why_is_important,
                status,
                q2_status_update,
                q3_status_update,
                final_status_update
            ) VALUES (
                ?1,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM objectives),
                ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
            );",
            params![
                objective.id.as_str(),
                objective.title.as_str(),
                objective.description.as_str(),
                objective.owner.as_str(),
                objective.why_is_important.as_deref(),
                objective.status.map(ObjectiveStatus::as_str),
                objective.q2_status_update.as_deref(),
                objective.q3_status_update.as_deref(),
                objective.final_status_update.as_deref(),
            ],
        )?;
        insert_key_results(&tx, objective)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_objective(&mut self, objective: &Objective) -> RepoResult<()> {
        ensure_writable(objective)?;

        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE objectives
             SET
                title = ?2,
                description = ?3,
                owner = ?4,
                why_is_important = ?5,
                status = ?6,
                q2_status_update = ?7,
                q3_status_update = ?8,
                final_status_update = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                objective.id.as_str(),
                objective.title.as_str(),
                objective.description.as_str(),
                objective.owner.as_str(),
                objective.why_is_important.as_deref(),
                objective.status.map(ObjectiveStatus::as_str),
                objective.q2_status_update.as_deref(),
                objective.q3_status_update.as_deref(),
                objective.final_status_update.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(objective.id.clone()));
        }

        tx.execute(
            "DELETE FROM key_results WHERE objective_id = ?1;",
            [objective.id.as_str()],
        )?;
        insert_key_results(&tx, objective)?;
        tx.commit()?;
        Ok(())
    }

    fn set_status(&mut self, id: &str, status: ObjectiveStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE objectives
             SET
                status = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_objective(&mut self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM objectives WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get_objective(&self, id: &str) -> RepoResult<Option<Objective>> {
        let header = self
            .conn
            .query_row(
                &format!("{OBJECTIVE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_objective_row(row)),
            )
            .optional()?;
        let Some(header) = header else {
            return Ok(None);
        };
        let mut objective = header?;

        let mut stmt = self.conn.prepare(&format!(
            "{KEY_RESULT_SELECT_SQL} WHERE objective_id = ?1 ORDER BY position ASC;"
        ))?;
        let mut rows = stmt.query([id])?;
        while let Some(row) = rows.next()? {
            let (_, key_result) = parse_key_result_row(row)?;
            objective.key_results.push(key_result);
        }
        Ok(Some(objective))
    }

    fn list_objectives(&self) -> RepoResult<Vec<Objective>> {
        let mut key_results: HashMap<ObjectiveId, Vec<KeyResult>> = HashMap::new();
        let mut stmt = self.conn.prepare(&format!(
            "{KEY_RESULT_SELECT_SQL} ORDER BY objective_id ASC, position ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let (objective_id, key_result) = parse_key_result_row(row)?;
            key_results.entry(objective_id).or_default().push(key_result);
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{OBJECTIVE_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut objectives = Vec::new();
        while let Some(row) = rows.next()? {
            let mut objective = parse_objective_row(row)?;
            objective.key_results = key_results.remove(&objective.id).unwrap_or_default();
            objectives.push(objective);
        }
        Ok(objectives)
    }

    fn count_objectives(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM objectives;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative objective count {count}")))
    }
}

fn ensure_writable(objective: &Objective) -> RepoResult<()> {
    objective.validate()?;
    if objective.id.trim().is_empty() {
        return Err(RepoError::InvalidData("objective id is empty".to_string()));
    }
    if let Some(index) = objective
        .key_results
        .iter()
        .position(|kr| kr.id.as_deref().map_or(true, |id| id.trim().is_empty()))
    {
        return Err(RepoError::InvalidData(format!(
            "key result #{index} of `{}` has no id",
            objective.id
        )));
    }
    Ok(())
}

fn insert_key_results(tx: &Transaction<'_>, objective: &Objective) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO key_results (
            objective_id,
            id,
            position,
            title,
            how_it_is_measured,
            kind,
            start_value,
            target_value,
            current_value
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
    )?;
    for (position, kr) in objective.key_results.iter().enumerate() {
        stmt.execute(params![
            objective.id.as_str(),
            kr.id.as_deref(),
            position as i64,
            kr.title.as_str(),
            kr.how_it_is_measured.as_str(),
            kr.kind.as_str(),
            kr.start_value,
            kr.target_value,
            kr.current_value,
        ])?;
    }
    Ok(())
}

fn parse_objective_row(row: &Row<'_>) -> RepoResult<Objective> {
    let status = match row.get::<_, Option<String>>("status")? {
        Some(value) => Some(value.parse::<ObjectiveStatus>().map_err(|_| {
            RepoError::InvalidData(format!("invalid status `{value}` in objectives.status"))
        })?),
        None => None,
    };

    Ok(Objective {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        owner: row.get("owner")?,
        why_is_important: row.get("why_is_important")?,
        status,
        key_results: Vec::new(),
        q2_status_update: row.get("q2_status_update")?,
        q3_status_update: row.get("q3_status_update")?,
        final_status_update: row.get("final_status_update")?,
    })
}

fn parse_key_result_row(row: &Row<'_>) -> RepoResult<(ObjectiveId, KeyResult)> {
    let kind_text: String = row.get("kind")?;
    let kind = kind_text.parse::<KeyResultType>().map_err(|_| {
        RepoError::InvalidData(format!("invalid key result type `{kind_text}` in key_results.kind"))
    })?;

    let key_result = KeyResult {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        how_it_is_measured: row.get("how_it_is_measured")?,
        kind,
        start_value: row.get("start_value")?,
        target_value: row.get("target_value")?,
        current_value: row.get("current_value")?,
    };
    Ok((row.get("objective_id")?, key_result))
}
