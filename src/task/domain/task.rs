//! Task entity.

use super::{TaskId, TaskText};
use serde::{Deserialize, Serialize};

/// A single to-do entry.
///
/// The serialized field names form the persisted record schema
/// (`id`, `text`, `completed`); records carrying any other field are
/// rejected when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    id: TaskId,
    text: TaskText,
    completed: bool,
}

impl Task {
    /// Creates a new, not yet completed task.
    #[must_use]
    pub const fn new(id: TaskId, text: TaskText) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// Reconstructs a task with an explicit completion flag.
    #[must_use]
    pub const fn from_parts(id: TaskId, text: TaskText, completed: bool) -> Self {
        Self {
            id,
            text,
            completed,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task text.
    #[must_use]
    pub const fn text(&self) -> &TaskText {
        &self.text
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Flips the completion flag.
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
