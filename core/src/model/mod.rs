pub mod task;
pub mod update;

pub use task::{Priority, StatusFilter, Task, TaskDraft};
pub use update::{FieldUpdate, TaskUpdate};
