use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::models::{Repeat, Task, TaskStatus};
use crate::recurrence::next_due_date;
use crate::reminder::AlarmScheduler;
use crate::storage::TaskRepository;
use crate::Result;

/// Outcome of toggling a task's status.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    /// The status flipped; `completed_at` is stamped on completion and
    /// cleared on reversion.
    Toggled {
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    },
    /// A repeating task was "completed": it stays in progress and moves to
    /// the next occurrence instead.
    Rescheduled { next_due: DateTime<Utc> },
}

/// Decide what toggling a task's status does, without touching storage.
///
/// Completing a repeating, due-dated task derives the next occurrence from
/// the current due date. A repeating task with no due date has no anchor to
/// advance from and toggles like a plain task.
pub fn toggle_status(task: &Task, now: DateTime<Utc>) -> StatusChange {
    if task.status == TaskStatus::Complete {
        return StatusChange::Toggled {
            status: TaskStatus::InProgress,
            completed_at: None,
        };
    }

    if task.repeat != Repeat::Never {
        if let Some(due) = task.due_date {
            if let Some(next_due) = next_due_date(due, task.repeat) {
                return StatusChange::Rescheduled { next_due };
            }
        }
    }

    StatusChange::Toggled {
        status: TaskStatus::Complete,
        completed_at: Some(now),
    }
}

/// Toggle a task's status and persist the outcome, keeping its alarm in
/// sync through the scheduler seam.
pub fn apply_toggle(
    conn: &Connection,
    scheduler: &dyn AlarmScheduler,
    task_id: &str,
    now: DateTime<Utc>,
) -> Result<StatusChange> {
    let task = TaskRepository::get_by_id(conn, task_id)?;
    let change = toggle_status(&task, now);

    match &change {
        StatusChange::Toggled {
            status,
            completed_at,
        } => {
            TaskRepository::update_status(conn, task_id, *status, *completed_at, now)?;
            match status {
                TaskStatus::Complete => scheduler.cancel(conn, task_id)?,
                TaskStatus::InProgress => {
                    // A reverted task picks its reminder back up if still due
                    // in the future.
                    if let Some(due) = task.due_date {
                        if due > now {
                            scheduler.schedule(conn, &task.id, due)?;
                        }
                    }
                }
            }
        }
        StatusChange::Rescheduled { next_due } => {
            TaskRepository::update_due_date(
                conn,
                task_id,
                Some(*next_due),
                task.is_due_date_time_set,
                now,
            )?;
            scheduler.schedule(conn, &task.id, *next_due)?;
        }
    }

    Ok(change)
}
