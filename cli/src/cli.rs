use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "listo")]
#[command(version)]
#[command(about = "Group your task lists, schedule due dates, get reminded")]
pub struct Cli {
    /// Path to the database file (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage list groups
    #[command(subcommand)]
    Group(GroupCommand),

    /// Manage task lists
    #[command(subcommand)]
    List(ListCommand),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Manage a task's steps
    #[command(subcommand)]
    Step(StepCommand),

    /// Show task counts and the group / list / task tree
    Overview {
        /// Emit the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show due-dated tasks ordered by due date
    Scheduled,

    /// Search tasks by name
    Search { query: String },

    /// Watch for due reminders and fire desktop notifications
    Watch,

    /// Push a task's reminder 15 minutes out
    Snooze { task_id: String },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create a group
    Add { name: String },
    /// List groups
    Ls,
    /// Rename a group
    Rename { id: String, name: String },
    /// Delete a group; its lists move back to the default group
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Create a list
    Add {
        name: String,
        /// Group to file the list under
        #[arg(long, value_name = "GROUP_ID")]
        group: Option<String>,
        /// List color (red, orange, yellow, green, blue, purple)
        #[arg(long, default_value = "blue")]
        color: String,
    },
    /// List lists, optionally those of one group (plus ungrouped ones)
    Ls {
        #[arg(long, value_name = "GROUP_ID")]
        group: Option<String>,
    },
    /// Rename a list
    Rename { id: String, name: String },
    /// Change a list's color
    Color { id: String, color: String },
    /// Move a list to a group, or back to the default group
    Move {
        id: String,
        #[arg(long, value_name = "GROUP_ID")]
        group: Option<String>,
    },
    /// Delete a list and everything in it
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create a task in a list
    Add {
        name: String,
        #[arg(long, value_name = "LIST_ID")]
        list: String,
        /// Due date: YYYY-MM-DD or "YYYY-MM-DD HH:MM" (local time)
        #[arg(long)]
        due: Option<String>,
        /// Repeat rule (never, daily, weekdays, weekly, monthly, yearly)
        #[arg(long)]
        repeat: Option<String>,
    },
    /// List tasks, optionally those of one list
    Ls {
        #[arg(long, value_name = "LIST_ID")]
        list: Option<String>,
    },
    /// Show one task with its steps as JSON
    Show { id: String },
    /// Toggle a task between in-progress and complete
    Toggle { id: String },
    /// Set or clear a task's due date
    Due {
        id: String,
        /// YYYY-MM-DD or "YYYY-MM-DD HH:MM"; omit to clear
        due: Option<String>,
    },
    /// Set a task's repeat rule
    Repeat { id: String, repeat: String },
    /// Set or clear a task's note
    Note {
        id: String,
        /// Omit to clear
        note: Option<String>,
    },
    /// Rename a task
    Rename { id: String, name: String },
    /// Delete a task and its steps
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum StepCommand {
    /// Add a step to a task
    Add {
        name: String,
        #[arg(long, value_name = "TASK_ID")]
        task: String,
    },
    /// Toggle a step between in-progress and complete
    Toggle { id: String },
    /// Rename a step
    Rename { id: String, name: String },
    /// Delete a step
    Rm { id: String },
}
