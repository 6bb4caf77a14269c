use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Group;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ListColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl ListColor {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(ListColor::Red),
            "orange" => Some(ListColor::Orange),
            "yellow" => Some(ListColor::Yellow),
            "green" => Some(ListColor::Green),
            "blue" => Some(ListColor::Blue),
            "purple" => Some(ListColor::Purple),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            ListColor::Red => "red".to_string(),
            ListColor::Orange => "orange".to_string(),
            ListColor::Yellow => "yellow".to_string(),
            ListColor::Green => "green".to_string(),
            ListColor::Blue => "blue".to_string(),
            ListColor::Purple => "purple".to_string(),
        }
    }
}

impl Default for ListColor {
    fn default() -> Self {
        ListColor::Blue
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskList {
    pub id: String,
    pub name: String,
    pub color: ListColor,
    pub group_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskList {
    /// Create a new list; lists without an explicit group land in the
    /// default group.
    pub fn new(name: String, color: ListColor, group_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            color,
            group_id: group_id.unwrap_or_else(|| Group::DEFAULT_ID.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
