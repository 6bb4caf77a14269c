use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::models::{Task, TaskList};
use crate::recurrence::next_scheduled_due_date;
use crate::storage::{ListRepository, ReminderRepository, TaskRepository};
use crate::transition::{apply_toggle, StatusChange};
use crate::Result;

/// How far a snoozed reminder is pushed out.
pub const SNOOZE_MINUTES: i64 = 15;

/// Registers and cancels alarms for tasks.
pub trait AlarmScheduler {
    fn schedule(&self, conn: &Connection, task_id: &str, at: DateTime<Utc>) -> Result<()>;
    fn cancel(&self, conn: &Connection, task_id: &str) -> Result<()>;
}

/// Renders and dismisses user-facing notifications. Showing is best-effort;
/// implementations log failures instead of propagating them.
pub trait Notifier {
    fn show(&self, task: &Task, list: &TaskList);
    fn dismiss(&self, task_id: &str);
}

/// Alarm registrations persisted in the `reminders` table. The watch loop
/// polls it for elapsed fire times.
pub struct SqliteAlarmStore;

impl AlarmScheduler for SqliteAlarmStore {
    fn schedule(&self, conn: &Connection, task_id: &str, at: DateTime<Utc>) -> Result<()> {
        ReminderRepository::upsert(conn, task_id, at)
    }

    fn cancel(&self, conn: &Connection, task_id: &str) -> Result<()> {
        ReminderRepository::delete(conn, task_id)
    }
}

/// Reminder operations around a task's due date: scheduling, snoozing,
/// completing from a notification, and re-registration at startup.
pub struct ReminderEnvironment<S, N> {
    scheduler: S,
    notifier: N,
}

impl<S: AlarmScheduler, N: Notifier> ReminderEnvironment<S, N> {
    pub fn new(scheduler: S, notifier: N) -> Self {
        Self {
            scheduler,
            notifier,
        }
    }

    /// Show the notification for a task's reminder. Returns None when the
    /// task is gone, complete, or no longer due-dated.
    pub fn notify(&self, conn: &Connection, task_id: &str) -> Result<Option<(Task, TaskList)>> {
        let Some(task) = Self::reminderable(conn, task_id)? else {
            return Ok(None);
        };
        let list = ListRepository::get_by_id(conn, &task.list_id)?;

        log::debug!("showing reminder for task {} ({})", task.id, task.name);
        self.notifier.show(&task, &list);

        Ok(Some((task, list)))
    }

    /// Push a task's reminder out by the snooze interval and dismiss its
    /// notification. Returns the new fire time.
    pub fn snooze(
        &self,
        conn: &Connection,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let Some(task) = Self::reminderable(conn, task_id)? else {
            return Ok(None);
        };

        let fire_at = now + Duration::minutes(SNOOZE_MINUTES);
        self.scheduler.schedule(conn, &task.id, fire_at)?;
        self.notifier.dismiss(&task.id);

        log::debug!("snoozed reminder for task {} until {}", task.id, fire_at);
        Ok(Some(fire_at))
    }

    /// Complete a task from its notification: run the status transition
    /// (recurrence reschedules instead of completing), keep the alarm in
    /// sync, dismiss the notification.
    pub fn complete(
        &self,
        conn: &Connection,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<StatusChange>> {
        let Some(task) = Self::reminderable(conn, task_id)? else {
            return Ok(None);
        };

        let change = apply_toggle(conn, &self.scheduler, &task.id, now)?;
        self.notifier.dismiss(&task.id);

        Ok(Some(change))
    }

    /// Re-register the alarms of every scheduled task; alarms do not
    /// survive restarts without this. Returns how many were registered.
    pub fn restart_all(&self, conn: &Connection, now: DateTime<Utc>) -> Result<usize> {
        let mut registered = 0;
        for task in TaskRepository::scheduled(conn)? {
            if let Some(due) = next_scheduled_due_date(&task, now) {
                if due > now {
                    self.scheduler.schedule(conn, &task.id, due)?;
                    registered += 1;
                }
            }
        }

        log::info!("re-registered {} reminders", registered);
        Ok(registered)
    }

    /// Register a task's alarm for its due date, only if the task is
    /// incomplete and the due date lies in the future.
    pub fn schedule_for(&self, conn: &Connection, task: &Task, now: DateTime<Utc>) -> Result<bool> {
        let Some(due) = task.due_date else {
            return Ok(false);
        };
        if task.is_complete() || due <= now {
            return Ok(false);
        }

        self.scheduler.schedule(conn, &task.id, due)?;
        Ok(true)
    }

    /// Fire every elapsed alarm: show its notification and clear the
    /// registration so it fires once. Stale registrations (task deleted or
    /// completed meanwhile) are cleared silently. Returns the fired tasks.
    pub fn fire_due(&self, conn: &Connection, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let mut fired = Vec::new();
        for reminder in ReminderRepository::due(conn, now)? {
            if let Some((task, _list)) = self.notify(conn, &reminder.task_id)? {
                fired.push(task);
            }
            ReminderRepository::delete(conn, &reminder.task_id)?;
        }
        Ok(fired)
    }

    fn reminderable(conn: &Connection, task_id: &str) -> Result<Option<Task>> {
        let task = TaskRepository::find_by_id(conn, task_id)?;
        Ok(task.filter(Task::is_reminder_eligible))
    }
}
