use chrono::{DateTime, Utc};

use crate::models::{
    datetime_to_timestamp, timestamp_to_datetime, Repeat, Task, TaskOverallCount, TaskStatus,
    TaskWithSteps,
};
use crate::storage::StepRepository;
use crate::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_COLUMNS: &str = "id, name, status, due_date, is_due_date_time_set, completed_at, \
                            repeat, note, list_id, created_at, updated_at";

pub struct TaskRepository;

impl TaskRepository {
    /// Create a new task
    pub fn create(conn: &Connection, task: &Task) -> Result<()> {
        conn.execute(
            "INSERT INTO tasks (id, name, status, due_date, is_due_date_time_set, completed_at,
             repeat, note, list_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                task.id,
                task.name,
                task.status.to_string(),
                task.due_date.as_ref().map(datetime_to_timestamp),
                task.is_due_date_time_set,
                task.completed_at.as_ref().map(datetime_to_timestamp),
                task.repeat.to_string(),
                task.note,
                task.list_id,
                datetime_to_timestamp(&task.created_at),
                datetime_to_timestamp(&task.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Get a task by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Task> {
        let mut stmt =
            conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;

        let task = stmt.query_row(params![id], Self::map_row)?;

        Ok(task)
    }

    /// Get a task by ID, None when it no longer exists (stale alarms point
    /// at deleted tasks)
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Task>> {
        let mut stmt =
            conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;

        let task = stmt
            .query_row(params![id], Self::map_row)
            .optional()?;

        Ok(task)
    }

    /// Get the tasks of one list; undated tasks sort last.
    pub fn by_list(conn: &Connection, list_id: &str) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE list_id = ?1
             ORDER BY due_date IS NULL, due_date, created_at, id"
        ))?;

        let tasks = stmt
            .query_map(params![list_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Get all due-dated tasks ordered by due date ascending (the scheduled
    /// view). Tasks without a due date are not scheduled and are excluded.
    pub fn ordered_by_due_date(conn: &Connection) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE due_date IS NOT NULL
             ORDER BY due_date, created_at, id"
        ))?;

        let tasks = stmt
            .query_map([], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Get the incomplete tasks that carry a due date: the set whose alarms
    /// must be (re-)registered.
    pub fn scheduled(conn: &Connection) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE status != 'complete' AND due_date IS NOT NULL
             ORDER BY due_date, created_at, id"
        ))?;

        let tasks = stmt
            .query_map([], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Count incomplete tasks: in total, due before `tomorrow_start`
    /// (overdue or due today), and scheduled at all.
    pub fn overall_count(
        conn: &Connection,
        tomorrow_start: DateTime<Utc>,
    ) -> Result<TaskOverallCount> {
        let count = conn.query_row(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN due_date < ?1 THEN 1 END),
                    COUNT(due_date)
             FROM tasks WHERE status != 'complete'",
            params![datetime_to_timestamp(&tomorrow_start)],
            |row| {
                Ok(TaskOverallCount {
                    total: row.get(0)?,
                    due_today: row.get(1)?,
                    scheduled: row.get(2)?,
                })
            },
        )?;

        Ok(count)
    }

    /// Search tasks by name
    pub fn search(conn: &Connection, query: &str) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE name LIKE ?1
             ORDER BY due_date IS NULL, due_date, created_at, id"
        ))?;

        let search_pattern = format!("%{}%", query);
        let tasks = stmt
            .query_map(params![search_pattern], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Rename a task
    pub fn rename(conn: &Connection, id: &str, name: &str) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE tasks SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, datetime_to_timestamp(&chrono::Utc::now()), id],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Update a task's status and completion stamp
    pub fn update_status(
        conn: &Connection,
        id: &str,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE tasks SET status = ?1, completed_at = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                status.to_string(),
                completed_at.as_ref().map(datetime_to_timestamp),
                datetime_to_timestamp(&updated_at),
                id,
            ],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Update a task's due date (None clears it)
    pub fn update_due_date(
        conn: &Connection,
        id: &str,
        due_date: Option<DateTime<Utc>>,
        is_due_date_time_set: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE tasks SET due_date = ?1, is_due_date_time_set = ?2, updated_at = ?3
             WHERE id = ?4",
            params![
                due_date.as_ref().map(datetime_to_timestamp),
                is_due_date_time_set,
                datetime_to_timestamp(&updated_at),
                id,
            ],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Update a task's repeat rule
    pub fn update_repeat(conn: &Connection, id: &str, repeat: Repeat) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE tasks SET repeat = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                repeat.to_string(),
                datetime_to_timestamp(&chrono::Utc::now()),
                id
            ],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Update a task's note (None clears it)
    pub fn update_note(conn: &Connection, id: &str, note: Option<&str>) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE tasks SET note = ?1, updated_at = ?2 WHERE id = ?3",
            params![note, datetime_to_timestamp(&chrono::Utc::now()), id],
        )?;
        Self::require_found(rows_affected, id)
    }

    /// Delete a task; its steps and pending reminder cascade away.
    pub fn delete(conn: &Connection, id: &str) -> Result<()> {
        let rows_affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Self::require_found(rows_affected, id)
    }

    /// Get one task together with its steps
    pub fn with_steps(conn: &Connection, id: &str) -> Result<TaskWithSteps> {
        let task = Self::get_by_id(conn, id)?;
        let steps = StepRepository::by_task(conn, &task.id)?;
        Ok(TaskWithSteps { task, steps })
    }

    /// Get every task together with its steps
    pub fn all_with_steps(conn: &Connection) -> Result<Vec<TaskWithSteps>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             ORDER BY due_date IS NULL, due_date, created_at, id"
        ))?;
        let tasks = stmt
            .query_map([], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Self::expand(conn, tasks)
    }

    /// Get one list's tasks together with their steps
    pub fn with_steps_by_list(conn: &Connection, list_id: &str) -> Result<Vec<TaskWithSteps>> {
        Self::expand(conn, Self::by_list(conn, list_id)?)
    }

    fn expand(conn: &Connection, tasks: Vec<Task>) -> Result<Vec<TaskWithSteps>> {
        let mut result = Vec::with_capacity(tasks.len());
        for task in tasks {
            let steps = StepRepository::by_task(conn, &task.id)?;
            result.push(TaskWithSteps { task, steps });
        }
        Ok(result)
    }

    fn require_found(rows_affected: usize, id: &str) -> Result<()> {
        if rows_affected == 0 {
            return Err(Error::NotFound(format!("Task not found: {}", id)));
        }
        Ok(())
    }

    fn map_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            name: row.get(1)?,
            status: TaskStatus::from_str(&row.get::<_, String>(2)?)
                .unwrap_or(TaskStatus::InProgress),
            due_date: row.get::<_, Option<i64>>(3)?.map(timestamp_to_datetime),
            is_due_date_time_set: row.get(4)?,
            completed_at: row.get::<_, Option<i64>>(5)?.map(timestamp_to_datetime),
            repeat: Repeat::from_str(&row.get::<_, String>(6)?).unwrap_or(Repeat::Never),
            note: row.get(7)?,
            list_id: row.get(8)?,
            created_at: timestamp_to_datetime(row.get(9)?),
            updated_at: timestamp_to_datetime(row.get(10)?),
        })
    }
}
