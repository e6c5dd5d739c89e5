/// Error taxonomy for the task store
use std::path::PathBuf;
use thiserror::Error;

pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("invalid task name: {0}")]
    InvalidName(String),

    #[error("invalid status '{0}' (expected one of: todo, in-progress, done)")]
    InvalidStatus(String),

    #[error("task {0} not found")]
    TaskNotFound(u32),

    /// Every task id up to `u32::MAX` has been handed out.
    #[error("no task ids left to assign")]
    IdsExhausted,

    /// The store file exists but cannot be read or understood. Never auto-repaired.
    #[error("store file {} is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("failed to access store file {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}
