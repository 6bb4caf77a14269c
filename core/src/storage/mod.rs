mod database;
mod group_repository;
mod list_repository;
mod reminder_repository;
mod step_repository;
mod task_repository;

pub use database::{Connection, Database};
pub use group_repository::GroupRepository;
pub use list_repository::ListRepository;
pub use reminder_repository::ReminderRepository;
pub use step_repository::StepRepository;
pub use task_repository::TaskRepository;
