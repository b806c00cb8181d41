use crate::error::Result;
use crate::model::task::Task;

/// Backing store for the whole task collection.
pub trait TaskStorage {
    /// Reads every stored task, in storage order. A missing store is an empty list.
    fn load(&self) -> Result<Vec<Task>>;
    /// Replaces the stored collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}
