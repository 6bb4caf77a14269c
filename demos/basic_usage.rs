// Example: Basic usage of the listo-core library
use std::fs;

use chrono::{Duration, Utc};
use listo_core::models::*;
use listo_core::recurrence;
use listo_core::reminder::{ReminderEnvironment, SqliteAlarmStore};
use listo_core::storage::*;
use listo_core::transition::{toggle_status, StatusChange};

struct SilentNotifier;

impl listo_core::reminder::Notifier for SilentNotifier {
    fn show(&self, task: &Task, list: &TaskList) {
        println!("   🔔 {} ({})", task.name, list.name);
    }

    fn dismiss(&self, _task_id: &str) {}
}

fn main() -> anyhow::Result<()> {
    let db_path = "basic_usage_listo.db";
    fs::remove_file(db_path).ok(); // Clean up previous run

    println!("--- Basic Usage of listo-core ---");

    // Initialize database
    let db = Database::new(db_path);
    let conn = db.create()?;
    println!(
        "   ✓ Database created with schema version {}",
        db.get_schema_version(&conn)?
    );

    // ========== Create a group and lists ==========
    println!("\n2. Creating a group and lists...");
    let work = Group::new("Work".to_string());
    GroupRepository::create(&conn, &work)?;
    println!("   ✓ Created group: {}", work.name);

    let sprint = TaskList::new("Sprint".to_string(), ListColor::Blue, Some(work.id.clone()));
    ListRepository::create(&conn, &sprint)?;
    println!("   ✓ Created list: {}", sprint.name);

    // This one stays ungrouped and lands in the default group.
    let groceries = TaskList::new("Groceries".to_string(), ListColor::Green, None);
    ListRepository::create(&conn, &groceries)?;
    println!("   ✓ Created ungrouped list: {}", groceries.name);

    // ========== Create tasks ==========
    println!("\n3. Creating tasks...");
    let mut report = Task::new("Write status report".to_string(), sprint.id.clone());
    report.due_date = Some(Utc::now() + Duration::days(1));
    report.is_due_date_time_set = true;
    TaskRepository::create(&conn, &report)?;
    println!("   ✓ Created task with due date: {}", report.name);

    let mut standup = Task::new("Prepare standup notes".to_string(), sprint.id.clone());
    standup.due_date = Some(Utc::now() + Duration::hours(2));
    standup.repeat = Repeat::Weekdays;
    TaskRepository::create(&conn, &standup)?;
    println!("   ✓ Created repeating task: {}", standup.name);

    let milk = Task::new("Buy milk".to_string(), groceries.id.clone());
    TaskRepository::create(&conn, &milk)?;
    println!("   ✓ Created task: {}", milk.name);

    // ========== Break a task into steps ==========
    println!("\n4. Adding steps...");
    let gather = Step::new("Gather metrics".to_string(), report.id.clone());
    let draft = Step::new("Draft summary".to_string(), report.id.clone());
    StepRepository::create(&conn, &gather)?;
    StepRepository::create(&conn, &draft)?;
    println!("   ✓ Added 2 steps to '{}'", report.name);

    // ========== Register reminders ==========
    println!("\n5. Registering reminders...");
    let env = ReminderEnvironment::new(SqliteAlarmStore, SilentNotifier);
    let registered = env.restart_all(&conn, Utc::now())?;
    println!("   ✓ Registered {} reminders", registered);

    // ========== Toggle statuses ==========
    println!("\n6. Toggling statuses...");
    let change = toggle_status(&milk, Utc::now());
    println!("   • Completing '{}' -> {:?}", milk.name, change);
    if let StatusChange::Toggled {
        status,
        completed_at,
    } = change
    {
        TaskRepository::update_status(&conn, &milk.id, status, completed_at, Utc::now())?;
    }

    // Completing the repeating task moves it to its next occurrence instead.
    if let Some(next) = recurrence::next_due_date(standup.due_date.unwrap(), standup.repeat) {
        println!("   • '{}' would next occur at {}", standup.name, next);
    }

    // ========== Query and display ==========
    println!("\n7. Querying data...");

    let count = TaskRepository::overall_count(&conn, Utc::now() + Duration::days(1))?;
    println!(
        "   • {} open tasks, {} due soon, {} scheduled",
        count.total, count.due_today, count.scheduled
    );

    let scheduled = TaskRepository::ordered_by_due_date(&conn)?;
    println!("   • Scheduled tasks:");
    for task in &scheduled {
        println!("     - {}", task.name);
    }

    println!("   • Full tree:");
    for group in GroupRepository::all_with_lists(&conn)? {
        println!("     {} ", group.group.name);
        for list in &group.lists {
            println!("       {} ({} tasks)", list.list.name, list.tasks.len());
        }
    }

    let results = TaskRepository::search(&conn, "report")?;
    println!("   • Search for 'report': {} result(s)", results.len());

    // ========== Cleanup ==========
    println!("\n8. Creating backup...");
    db.backup("basic_usage_backup.db")?;
    println!("   ✓ Backup created");

    println!("\n✅ Example completed successfully!");
    println!("\nYou can inspect the database with: sqlite3 {}", db_path);

    Ok(())
}
