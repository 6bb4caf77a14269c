use chrono::Local;
use listo_core::models::{Task, TaskList};
use listo_core::reminder::Notifier;
use notify_rust::Notification;

/// Renders reminders as desktop notifications.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn show(&self, task: &Task, list: &TaskList) {
        let body = match task.due_date {
            Some(due) => format!(
                "{} · due {}",
                list.name,
                due.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ),
            None => list.name.clone(),
        };

        if let Err(err) = Notification::new()
            .appname("listo")
            .summary(&task.name)
            .body(&body)
            .show()
        {
            log::warn!("failed to show notification for task {}: {}", task.id, err);
        }
    }

    fn dismiss(&self, _task_id: &str) {
        // Desktop notifications time out on their own.
    }
}
