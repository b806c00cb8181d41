use chrono::Utc;

use crate::config::Config;
use crate::error::{Result, TaskError};
use crate::model::task::{StatusFilter, Task, TaskDraft};
use crate::model::update::TaskUpdate;
use crate::repository::file::JsonFileStorage;
use crate::repository::traits::TaskStorage;

/// Owns the task collection and writes the whole of it back after every mutation.
pub struct TaskRepository<S: TaskStorage> {
    storage: S,
    tasks: Vec<Task>,
    // Highest id handed out so far, so an id deleted in this session is not reissued.
    last_id: u64,
}

impl TaskRepository<JsonFileStorage> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(JsonFileStorage::new(&config.storage_path))
    }
}

impl<S: TaskStorage> TaskRepository<S> {
    /// Creates the repository and loads the current contents of `storage`.
    pub fn open(storage: S) -> Result<Self> {
        let mut repo = Self {
            storage,
            tasks: Vec::new(),
            last_id: 0,
        };
        repo.load()?;
        Ok(repo)
    }

    /// Replaces the in-memory collection with what the storage holds.
    /// On failure the collection is left empty.
    pub fn load(&mut self) -> Result<()> {
        self.tasks.clear();
        let tasks = self.storage.load()?;
        self.last_id = self.last_id.max(max_id(&tasks));
        self.tasks = tasks;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.tasks)
    }

    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        let id = self
            .last_id
            .max(max_id(&self.tasks))
            .checked_add(1)
            .ok_or_else(|| TaskError::validation("Task id space exhausted"))?;
        let task = Task::new(id, draft, Utc::now())?;

        let mut tasks = self.tasks.clone();
        tasks.push(task.clone());
        self.commit(tasks)?;
        self.last_id = id;

        log::info!("added task #{}", id);
        Ok(task)
    }

    /// Snapshots of the stored tasks, in storage order.
    pub fn list(&self, status: Option<StatusFilter>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| status.map_or(true, |s| s.matches(task)))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Result<Task> {
        self.position(id).map(|pos| self.tasks[pos].clone())
    }

    /// Applies the fields set in `update`. The merged task is validated before anything is written.
    pub fn update(&mut self, id: u64, update: TaskUpdate) -> Result<Task> {
        let pos = self.position(id)?;
        if update.is_empty() {
            return Ok(self.tasks[pos].clone());
        }

        let mut tasks = self.tasks.clone();
        update.apply_to(&mut tasks[pos], Utc::now())?;
        let updated = tasks[pos].clone();
        self.commit(tasks)?;

        log::info!("updated task #{}", id);
        Ok(updated)
    }

    /// Marks the task completed, or pending again when `undo` is set.
    pub fn complete(&mut self, id: u64, undo: bool) -> Result<Task> {
        let pos = self.position(id)?;

        let mut tasks = self.tasks.clone();
        tasks[pos].set_completed(!undo, Utc::now());
        let updated = tasks[pos].clone();
        self.commit(tasks)?;

        log::info!("task #{} marked {}", id, if undo { "pending" } else { "completed" });
        Ok(updated)
    }

    /// Removes the task. Remaining ids are left as they are.
    pub fn delete(&mut self, id: u64) -> Result<Task> {
        let pos = self.position(id)?;

        let mut tasks = self.tasks.clone();
        let removed = tasks.remove(pos);
        self.commit(tasks)?;

        log::info!("deleted task #{}", id);
        Ok(removed)
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    // The in-memory collection only changes once the storage accepted it.
    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.storage.save(&tasks)?;
        self.tasks = tasks;
        Ok(())
    }
}

fn max_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0)
}
