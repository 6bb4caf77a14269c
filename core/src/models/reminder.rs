use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending alarm registration for a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub task_id: String,
    pub fire_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(task_id: String, fire_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            fire_at,
            updated_at: Utc::now(),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.fire_at <= now
    }
}
