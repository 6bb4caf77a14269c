use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TaskStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub task_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Step {
    /// Create a new in-progress step under a task
    pub fn new(name: String, task_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            status: TaskStatus::InProgress,
            task_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_creation() {
        let step = Step::new("Outline slides".to_string(), "task-1".to_string());
        assert_eq!(step.name, "Outline slides");
        assert_eq!(step.status, TaskStatus::InProgress);
        assert_eq!(step.task_id, "task-1");
    }
}
