mod group;
mod hierarchy;
mod list;
mod reminder;
mod step;
mod task;

pub use group::Group;
pub use hierarchy::{GroupWithLists, ListWithTasks, TaskWithSteps};
pub use list::{ListColor, TaskList};
pub use reminder::Reminder;
pub use step::Step;
pub use task::{Repeat, Task, TaskOverallCount, TaskStatus};

use chrono::{DateTime, Utc};

/// Convert Unix timestamp (seconds) to DateTime<Utc>
pub fn timestamp_to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

/// Convert DateTime<Utc> to Unix timestamp (seconds)
pub fn datetime_to_timestamp(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp()
}
