use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskError>;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Bad user input: empty title, unparsable date, unknown priority.
    #[error("{0}")]
    Validation(String),

    #[error("Task #{0} was not found")]
    NotFound(u64),

    /// The backing file exists but does not hold a valid task list.
    #[error("Failed to parse task storage file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The storage location could not be determined.
    #[error("{0}")]
    Config(String),

    #[error("Failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TaskError {
    pub fn validation(message: impl Into<String>) -> Self {
        TaskError::Validation(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TaskError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        TaskError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
