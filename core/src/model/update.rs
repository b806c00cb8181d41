use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::model::task::{normalize_description, normalize_title, Priority, Task};

/// A change to an optional field: leave it, overwrite it, or clear it to null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    /// Builds an update from a `--field VALUE` / `--clear-field` flag pair.
    /// Clearing wins when both are present.
    pub fn from_flags(value: Option<T>, clear: bool) -> Self {
        match (value, clear) {
            (_, true) => FieldUpdate::Clear,
            (Some(value), false) => FieldUpdate::Set(value),
            (None, false) => FieldUpdate::Unchanged,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Set(value) => *slot = Some(value),
            FieldUpdate::Clear => *slot = None,
        }
    }
}

/// Partial overwrite of a task. Fields left at their default are not touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub due_date: FieldUpdate<NaiveDate>,
    pub priority: FieldUpdate<Priority>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_unchanged()
            && self.due_date.is_unchanged()
            && self.priority.is_unchanged()
            && self.completed.is_none()
    }

    pub(crate) fn apply_to(self, task: &mut Task, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = self.title {
            task.title = normalize_title(&title)?;
        }
        match self.description {
            FieldUpdate::Set(text) => task.description = normalize_description(Some(text)),
            other => other.apply(&mut task.description),
        }
        self.due_date.apply(&mut task.due_date);
        self.priority.apply(&mut task.priority);
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.touch(now);
        task.validate()
    }
}
