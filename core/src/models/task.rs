use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TaskStatus {
    InProgress,
    Complete,
}

impl TaskStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_progress" => Some(TaskStatus::InProgress),
            "complete" => Some(TaskStatus::Complete),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            TaskStatus::InProgress => "in_progress".to_string(),
            TaskStatus::Complete => "complete".to_string(),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::InProgress => TaskStatus::Complete,
            TaskStatus::Complete => TaskStatus::InProgress,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Repeat {
    Never,
    Daily,
    Weekdays,
    Weekly,
    Monthly,
    Yearly,
}

impl Repeat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "never" => Some(Repeat::Never),
            "daily" => Some(Repeat::Daily),
            "weekdays" => Some(Repeat::Weekdays),
            "weekly" => Some(Repeat::Weekly),
            "monthly" => Some(Repeat::Monthly),
            "yearly" => Some(Repeat::Yearly),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Repeat::Never => "never".to_string(),
            Repeat::Daily => "daily".to_string(),
            Repeat::Weekdays => "weekdays".to_string(),
            Repeat::Weekly => "weekly".to_string(),
            Repeat::Monthly => "monthly".to_string(),
            Repeat::Yearly => "yearly".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the user picked a time of day or just a date.
    pub is_due_date_time_set: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub repeat: Repeat,
    pub note: Option<String>,
    pub list_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new in-progress task in a list
    pub fn new(name: String, list_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            status: TaskStatus::InProgress,
            due_date: None,
            is_due_date_time_set: false,
            completed_at: None,
            repeat: Repeat::Never,
            note: None,
            list_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Complete
    }

    /// A task is eligible for reminders while incomplete and due-dated.
    pub fn is_reminder_eligible(&self) -> bool {
        !self.is_complete() && self.due_date.is_some()
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Counts shown on the overview: incomplete tasks in total, due before
/// tomorrow, and carrying any due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskOverallCount {
    pub total: i64,
    pub due_today: i64,
    pub scheduled: i64,
}
