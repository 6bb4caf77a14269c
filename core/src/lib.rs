pub mod models;
pub mod recurrence;
pub mod reminder;
pub mod storage;
pub mod transition;

mod error;

pub use error::{Error, Result};
