use chrono::{DateTime, Utc};

use crate::models::{datetime_to_timestamp, timestamp_to_datetime, Reminder};
use crate::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct ReminderRepository;

impl ReminderRepository {
    /// Register (or move) a task's pending alarm
    pub fn upsert(conn: &Connection, task_id: &str, fire_at: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "INSERT INTO reminders (task_id, fire_at, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(task_id) DO UPDATE SET fire_at = excluded.fire_at,
                                                updated_at = excluded.updated_at",
            params![
                task_id,
                datetime_to_timestamp(&fire_at),
                datetime_to_timestamp(&chrono::Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// Get a task's pending alarm, if any
    pub fn get(conn: &Connection, task_id: &str) -> Result<Option<Reminder>> {
        let mut stmt = conn.prepare(
            "SELECT task_id, fire_at, updated_at FROM reminders WHERE task_id = ?1",
        )?;

        let reminder = stmt
            .query_row(params![task_id], Self::map_row)
            .optional()?;

        Ok(reminder)
    }

    /// Drop a task's pending alarm. Unlike entity deletes this is not an
    /// error when nothing was registered.
    pub fn delete(conn: &Connection, task_id: &str) -> Result<()> {
        conn.execute("DELETE FROM reminders WHERE task_id = ?1", params![task_id])?;
        Ok(())
    }

    /// Get the alarms that should have fired by `now`, oldest first
    pub fn due(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let mut stmt = conn.prepare(
            "SELECT task_id, fire_at, updated_at FROM reminders
             WHERE fire_at <= ?1 ORDER BY fire_at, task_id",
        )?;

        let reminders = stmt
            .query_map(params![datetime_to_timestamp(&now)], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reminders)
    }

    /// Count pending alarms
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))?;
        Ok(count)
    }

    fn map_row(row: &Row) -> rusqlite::Result<Reminder> {
        Ok(Reminder {
            task_id: row.get(0)?,
            fire_at: timestamp_to_datetime(row.get(1)?),
            updated_at: timestamp_to_datetime(row.get(2)?),
        })
    }
}
