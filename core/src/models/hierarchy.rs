use serde::{Deserialize, Serialize};

use crate::models::{Group, Step, Task, TaskList};

/// A task together with its steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskWithSteps {
    pub task: Task,
    pub steps: Vec<Step>,
}

/// A list together with its tasks and their steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListWithTasks {
    pub list: TaskList,
    pub tasks: Vec<TaskWithSteps>,
}

/// A group together with its lists, fully expanded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupWithLists {
    pub group: Group,
    pub lists: Vec<ListWithTasks>,
}
