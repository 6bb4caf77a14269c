use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use listo_core::models::{Group, ListColor, Repeat, Step, Task, TaskList, TaskStatus};
use listo_core::reminder::{AlarmScheduler, ReminderEnvironment, SqliteAlarmStore};
use listo_core::storage::{
    Connection, Database, GroupRepository, ListRepository, StepRepository, TaskRepository,
};
use listo_core::transition::{apply_toggle, StatusChange};

use crate::cli::{Cli, Commands, GroupCommand, ListCommand, StepCommand, TaskCommand};
use crate::notify::DesktopNotifier;
use crate::watch;

/// Date-only due dates get this local hour.
const DEFAULT_DUE_HOUR: u32 = 9;

pub fn run(args: Cli) -> Result<()> {
    let db_path = match args.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let log_dir = db_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let _logger = crate::logging::init(&log_dir).context("failed to initialize logging")?;

    let db = Database::new(&db_path);

    if matches!(args.command, Commands::Watch) {
        return watch::run(&db);
    }

    let conn = db.get_or_create()?;
    match args.command {
        Commands::Group(cmd) => group_cmd(&conn, cmd),
        Commands::List(cmd) => list_cmd(&conn, cmd),
        Commands::Task(cmd) => task_cmd(&conn, cmd),
        Commands::Step(cmd) => step_cmd(&conn, cmd),
        Commands::Overview { json } => overview(&conn, json),
        Commands::Scheduled => scheduled(&conn),
        Commands::Search { query } => search(&conn, &query),
        Commands::Snooze { task_id } => snooze(&conn, &task_id),
        Commands::Watch => unreachable!("handled above"),
    }
}

fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("could not determine the platform data directory")?;
    Ok(data_dir.join("listo").join("listo.db"))
}

fn group_cmd(conn: &Connection, cmd: GroupCommand) -> Result<()> {
    match cmd {
        GroupCommand::Add { name } => {
            let group = Group::new(name);
            GroupRepository::create(conn, &group)?;
            println!("created group {}  {}", group.id, group.name);
        }
        GroupCommand::Ls => {
            for group in GroupRepository::get_all(conn)? {
                println!("{}  {}", group.id, group.name);
            }
        }
        GroupCommand::Rename { id, name } => {
            GroupRepository::rename(conn, &id, &name)?;
            println!("renamed group {id}");
        }
        GroupCommand::Rm { id } => {
            GroupRepository::delete(conn, &id)?;
            println!("deleted group {id}; its lists moved to the default group");
        }
    }
    Ok(())
}

fn list_cmd(conn: &Connection, cmd: ListCommand) -> Result<()> {
    match cmd {
        ListCommand::Add { name, group, color } => {
            let color = parse_color(&color)?;
            let list = TaskList::new(name, color, group);
            ListRepository::create(conn, &list)?;
            println!("created list {}  {}", list.id, list.name);
        }
        ListCommand::Ls { group } => {
            let lists = match group {
                Some(group_id) => ListRepository::with_ungrouped(conn, &group_id)?,
                None => ListRepository::get_all(conn)?,
            };
            for list in lists {
                println!(
                    "{}  [{}] {}  (group {})",
                    list.id,
                    list.color.to_string(),
                    list.name,
                    list.group_id
                );
            }
        }
        ListCommand::Rename { id, name } => {
            ListRepository::rename(conn, &id, &name)?;
            println!("renamed list {id}");
        }
        ListCommand::Color { id, color } => {
            let color = parse_color(&color)?;
            ListRepository::set_color(conn, &id, color)?;
            println!("recolored list {id}");
        }
        ListCommand::Move { id, group } => {
            ListRepository::move_to_group(conn, &id, group.as_deref())?;
            println!("moved list {id}");
        }
        ListCommand::Rm { id } => {
            ListRepository::delete(conn, &id)?;
            println!("deleted list {id} and its tasks");
        }
    }
    Ok(())
}

fn task_cmd(conn: &Connection, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            name,
            list,
            due,
            repeat,
        } => {
            let mut task = Task::new(name, list);
            if let Some(due) = due {
                let (due_date, time_set) = parse_due(&due)?;
                task.due_date = Some(due_date);
                task.is_due_date_time_set = time_set;
            }
            if let Some(repeat) = repeat {
                task.repeat = parse_repeat(&repeat)?;
            }
            TaskRepository::create(conn, &task)?;

            let env = ReminderEnvironment::new(SqliteAlarmStore, DesktopNotifier);
            if env.schedule_for(conn, &task, Utc::now())? {
                log::info!("registered reminder for task {}", task.id);
            }
            println!("created task {}  {}", task.id, task.name);
        }
        TaskCommand::Ls { list } => {
            let tasks = match list {
                Some(list_id) => TaskRepository::with_steps_by_list(conn, &list_id)?,
                None => TaskRepository::all_with_steps(conn)?,
            };
            for entry in tasks {
                print_task_line(&entry.task, "");
                for step in &entry.steps {
                    print_step_line(step, "    ");
                }
            }
        }
        TaskCommand::Show { id } => {
            let entry = TaskRepository::with_steps(conn, &id)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        TaskCommand::Toggle { id } => toggle_task(conn, &id)?,
        TaskCommand::Due { id, due } => {
            let now = Utc::now();
            match due {
                Some(due) => {
                    let (due_date, time_set) = parse_due(&due)?;
                    TaskRepository::update_due_date(conn, &id, Some(due_date), time_set, now)?;
                    SqliteAlarmStore.cancel(conn, &id)?;

                    let task = TaskRepository::get_by_id(conn, &id)?;
                    let env = ReminderEnvironment::new(SqliteAlarmStore, DesktopNotifier);
                    env.schedule_for(conn, &task, now)?;
                    println!("task {id} due {}", format_due(&task));
                }
                None => {
                    TaskRepository::update_due_date(conn, &id, None, false, now)?;
                    SqliteAlarmStore.cancel(conn, &id)?;
                    println!("cleared due date of task {id}");
                }
            }
        }
        TaskCommand::Repeat { id, repeat } => {
            let repeat = parse_repeat(&repeat)?;
            TaskRepository::update_repeat(conn, &id, repeat)?;
            println!("task {id} repeats {}", repeat.to_string());
        }
        TaskCommand::Note { id, note } => {
            TaskRepository::update_note(conn, &id, note.as_deref())?;
            println!("updated note of task {id}");
        }
        TaskCommand::Rename { id, name } => {
            TaskRepository::rename(conn, &id, &name)?;
            println!("renamed task {id}");
        }
        TaskCommand::Rm { id } => {
            TaskRepository::delete(conn, &id)?;
            println!("deleted task {id}");
        }
    }
    Ok(())
}

fn toggle_task(conn: &Connection, id: &str) -> Result<()> {
    let change = apply_toggle(conn, &SqliteAlarmStore, id, Utc::now())?;
    match change {
        StatusChange::Toggled {
            status: TaskStatus::Complete,
            ..
        } => println!("completed task {id}"),
        StatusChange::Toggled { .. } => println!("reopened task {id}"),
        StatusChange::Rescheduled { next_due } => {
            println!(
                "rescheduled task {id} to {}",
                next_due.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}

fn step_cmd(conn: &Connection, cmd: StepCommand) -> Result<()> {
    match cmd {
        StepCommand::Add { name, task } => {
            let step = Step::new(name, task);
            StepRepository::create(conn, &step)?;
            println!("created step {}  {}", step.id, step.name);
        }
        StepCommand::Toggle { id } => {
            let step = StepRepository::get_by_id(conn, &id)?;
            let status = step.status.toggled();
            StepRepository::update_status(conn, &id, status, Utc::now())?;
            match status {
                TaskStatus::Complete => println!("completed step {id}"),
                TaskStatus::InProgress => println!("reopened step {id}"),
            }
        }
        StepCommand::Rename { id, name } => {
            StepRepository::rename(conn, &id, &name)?;
            println!("renamed step {id}");
        }
        StepCommand::Rm { id } => {
            StepRepository::delete(conn, &id)?;
            println!("deleted step {id}");
        }
    }
    Ok(())
}

fn overview(conn: &Connection, json: bool) -> Result<()> {
    let tree = GroupRepository::all_with_lists(conn)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    let count = TaskRepository::overall_count(conn, tomorrow_start()?)?;
    println!(
        "{} open tasks, {} due today or overdue, {} scheduled",
        count.total, count.due_today, count.scheduled
    );

    for group in &tree {
        println!("\n{}  {}", group.group.id, group.group.name);
        for list in &group.lists {
            println!("  {}  [{}] {}", list.list.id, list.list.color.to_string(), list.list.name);
            for entry in &list.tasks {
                print_task_line(&entry.task, "    ");
                for step in &entry.steps {
                    print_step_line(step, "        ");
                }
            }
        }
    }
    Ok(())
}

fn scheduled(conn: &Connection) -> Result<()> {
    for task in TaskRepository::ordered_by_due_date(conn)? {
        print_task_line(&task, "");
    }
    Ok(())
}

fn search(conn: &Connection, query: &str) -> Result<()> {
    for task in TaskRepository::search(conn, query)? {
        print_task_line(&task, "");
    }
    Ok(())
}

fn snooze(conn: &Connection, task_id: &str) -> Result<()> {
    let env = ReminderEnvironment::new(SqliteAlarmStore, DesktopNotifier);
    match env.snooze(conn, task_id, Utc::now())? {
        Some(fire_at) => println!(
            "snoozed task {task_id} until {}",
            fire_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        None => println!("task {task_id} has no active reminder (complete or undated)"),
    }
    Ok(())
}

fn parse_color(input: &str) -> Result<ListColor> {
    ListColor::from_str(input).with_context(|| {
        format!("unknown color '{input}' (red, orange, yellow, green, blue, purple)")
    })
}

fn parse_repeat(input: &str) -> Result<Repeat> {
    Repeat::from_str(input).with_context(|| {
        format!("unknown repeat rule '{input}' (never, daily, weekdays, weekly, monthly, yearly)")
    })
}

/// Parse "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" in local time. The bool reports
/// whether a time of day was given; date-only input lands on the default
/// hour.
fn parse_due(input: &str) -> Result<(DateTime<Utc>, bool)> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok((to_utc(datetime)?, true));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").with_context(|| {
        format!("invalid due date '{input}' (expected YYYY-MM-DD or \"YYYY-MM-DD HH:MM\")")
    })?;
    let datetime = date
        .and_hms_opt(DEFAULT_DUE_HOUR, 0, 0)
        .context("invalid default due time")?;
    Ok((to_utc(datetime)?, false))
}

fn to_utc(datetime: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&datetime)
        .single()
        .with_context(|| format!("ambiguous or invalid local time {datetime}"))
        .map(|local| local.with_timezone(&Utc))
}

fn tomorrow_start() -> Result<DateTime<Utc>> {
    let tomorrow = Local::now()
        .date_naive()
        .succ_opt()
        .context("date out of range")?;
    let midnight = tomorrow.and_hms_opt(0, 0, 0).context("invalid midnight")?;
    to_utc(midnight)
}

fn status_mark(status: TaskStatus) -> char {
    match status {
        TaskStatus::InProgress => ' ',
        TaskStatus::Complete => 'x',
    }
}

fn format_due(task: &Task) -> String {
    match task.due_date {
        Some(due) => {
            let local = due.with_timezone(&Local);
            if task.is_due_date_time_set {
                local.format("%Y-%m-%d %H:%M").to_string()
            } else {
                local.format("%Y-%m-%d").to_string()
            }
        }
        None => String::new(),
    }
}

fn print_task_line(task: &Task, indent: &str) {
    let mut line = format!("{indent}[{}] {}  {}", status_mark(task.status), task.id, task.name);
    let due = format_due(task);
    if !due.is_empty() {
        line.push_str(&format!("  due {due}"));
    }
    if task.repeat != Repeat::Never {
        line.push_str(&format!("  repeats {}", task.repeat.to_string()));
    }
    println!("{line}");
}

fn print_step_line(step: &Step, indent: &str) {
    println!(
        "{indent}[{}] {}  {}",
        status_mark(step.status),
        step.id,
        step.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_due_with_time() {
        let (due, time_set) = parse_due("2021-01-19 14:30").unwrap();
        assert!(time_set);

        let local = due.with_timezone(&Local);
        assert_eq!(local.hour(), 14);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn test_parse_due_date_only_defaults_morning() {
        let (due, time_set) = parse_due("2021-01-19").unwrap();
        assert!(!time_set);

        let local = due.with_timezone(&Local);
        assert_eq!(local.hour(), DEFAULT_DUE_HOUR);
        assert_eq!(local.minute(), 0);
    }

    #[test]
    fn test_parse_due_rejects_garbage() {
        assert!(parse_due("tomorrow").is_err());
        assert!(parse_due("2021-13-40").is_err());
    }

    #[test]
    fn test_format_due_respects_time_flag() {
        let mut task = Task::new("t".to_string(), "l".to_string());
        assert_eq!(format_due(&task), "");

        let (due, time_set) = parse_due("2021-01-19").unwrap();
        task.due_date = Some(due);
        task.is_due_date_time_set = time_set;
        assert_eq!(format_due(&task), "2021-01-19");

        let (due, time_set) = parse_due("2021-01-19 14:30").unwrap();
        task.due_date = Some(due);
        task.is_due_date_time_set = time_set;
        assert_eq!(format_due(&task), "2021-01-19 14:30");
    }
}
