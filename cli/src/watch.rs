use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use listo_core::reminder::{ReminderEnvironment, SqliteAlarmStore};
use listo_core::storage::Database;

use crate::notify::DesktopNotifier;

const POLL_INTERVAL_SECS: u64 = 1;

/// Run the reminder watcher until interrupted: re-register all alarms, then
/// poll for elapsed ones and fire desktop notifications.
pub fn run(db: &Database) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start watch runtime")?;

    runtime.block_on(poll_loop(db))
}

async fn poll_loop(db: &Database) -> Result<()> {
    let conn = db.get_or_create()?;
    let env = ReminderEnvironment::new(SqliteAlarmStore, DesktopNotifier);

    // OS-level alarms do not survive restarts; derive them from the tasks.
    let registered = env.restart_all(&conn, Utc::now())?;
    println!("watching reminders ({registered} registered); press Ctrl-C to stop");

    let mut interval = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let fired = env.fire_due(&conn, Utc::now())?;
        for task in &fired {
            log::info!("reminder fired for task {} ({})", task.id, task.name);
            println!("reminder: {}", task.name);
        }
    }
}
