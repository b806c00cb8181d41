pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod time;

pub use config::Config;
pub use error::{Result, TaskError};
pub use model::task::{Priority, StatusFilter, Task, TaskDraft};
pub use model::update::{FieldUpdate, TaskUpdate};
pub use repository::{JsonFileStorage, TaskRepository, TaskStorage};
pub use time::{parse_due_date, parse_iso_date};
