//! Error types for task domain validation and decoding.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The task text is empty after trimming.
    #[error("task text must not be empty")]
    EmptyTaskText,

    /// Two tasks in one list share an identifier.
    #[error("duplicate task identifier: {0}")]
    DuplicateTaskId(TaskId),
}

/// Error returned when a stored value cannot be read back as a task list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The value is not well-formed JSON or does not match the list schema.
    #[error("stored task list is malformed: {0}")]
    Malformed(String),

    /// The records parsed but do not form a valid task list.
    #[error("stored task list is invalid: {0}")]
    Invalid(#[from] TaskDomainError),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
