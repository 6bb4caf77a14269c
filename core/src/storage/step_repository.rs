use chrono::{DateTime, Utc};

use crate::models::{datetime_to_timestamp, timestamp_to_datetime, Step, TaskStatus};
use crate::{Error, Result};
use rusqlite::{params, Connection, Row};

const STEP_COLUMNS: &str = "id, name, status, task_id, created_at, updated_at";

pub struct StepRepository;

impl StepRepository {
    /// Create a new step
    pub fn create(conn: &Connection, step: &Step) -> Result<()> {
        conn.execute(
            "INSERT INTO steps (id, name, status, task_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                step.id,
                step.name,
                step.status.to_string(),
                step.task_id,
                datetime_to_timestamp(&step.created_at),
                datetime_to_timestamp(&step.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Get a step by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Step> {
        let mut stmt =
            conn.prepare(&format!("SELECT {STEP_COLUMNS} FROM steps WHERE id = ?1"))?;

        let step = stmt.query_row(params![id], Self::map_row)?;

        Ok(step)
    }

    /// Get the steps of one task
    pub fn by_task(conn: &Connection, task_id: &str) -> Result<Vec<Step>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {STEP_COLUMNS} FROM steps WHERE task_id = ?1 ORDER BY created_at, id"
        ))?;

        let steps = stmt
            .query_map(params![task_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(steps)
    }

    /// Rename a step
    pub fn rename(conn: &Connection, id: &str, name: &str) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE steps SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, datetime_to_timestamp(&chrono::Utc::now()), id],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Update a step's status
    pub fn update_status(
        conn: &Connection,
        id: &str,
        status: TaskStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE steps SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.to_string(), datetime_to_timestamp(&updated_at), id],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Delete a step
    pub fn delete(conn: &Connection, id: &str) -> Result<()> {
        let rows_affected = conn.execute("DELETE FROM steps WHERE id = ?1", params![id])?;
        Self::require_found(rows_affected, id)
    }

    fn require_found(rows_affected: usize, id: &str) -> Result<()> {
        if rows_affected == 0 {
            return Err(Error::NotFound(format!("Step not found: {}", id)));
        }
        Ok(())
    }

    fn map_row(row: &Row) -> rusqlite::Result<Step> {
        Ok(Step {
            id: row.get(0)?,
            name: row.get(1)?,
            status: TaskStatus::from_str(&row.get::<_, String>(2)?)
                .unwrap_or(TaskStatus::InProgress),
            task_id: row.get(3)?,
            created_at: timestamp_to_datetime(row.get(4)?),
            updated_at: timestamp_to_datetime(row.get(5)?),
        })
    }
}
