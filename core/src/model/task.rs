use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    // Older files were written with "normal".
    #[serde(alias = "normal")]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "h" | "high" => Ok(Priority::High),
            "m" | "med" | "medium" | "normal" => Ok(Priority::Medium),
            "l" | "low" => Ok(Priority::Low),
            other => Err(TaskError::validation(format!(
                "Unknown priority '{}': expected low, medium or high",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pending/completed partition used by list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TaskError;

    fn from_str(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "pending" => Ok(StatusFilter::Pending),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(TaskError::validation(format!(
                "Unknown status '{}': expected pending or completed",
                other
            ))),
        }
    }
}

/// User input for a new task. Validated when turned into a [`Task`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: u64, draft: TaskDraft, now: DateTime<Utc>) -> Result<Self> {
        let task = Self {
            id,
            title: normalize_title(&draft.title)?,
            description: normalize_description(draft.description),
            due_date: draft.due_date,
            completed: false,
            priority: draft.priority,
            created_at: now,
            updated_at: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks the invariants a stored task must hold.
    pub fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(TaskError::validation("Task id must be a positive integer"));
        }
        if self.title.trim().is_empty() {
            return Err(TaskError::validation(format!(
                "Task #{} has an empty title",
                self.id
            )));
        }
        Ok(())
    }

    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.touch(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

pub(crate) fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::validation("Title must not be empty"));
    }
    Ok(title.to_string())
}

pub(crate) fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
