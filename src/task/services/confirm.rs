//! Two-step delete protocol for the presentation boundary.

use tracing::debug;

use crate::task::domain::TaskId;

use super::TaskStore;

/// Pending delete request awaiting user confirmation.
///
/// The presentation layer calls [`Self::request`] when the user asks to
/// delete, then [`Self::confirm`] or [`Self::cancel`] once they answer.
/// Only a confirmed request reaches [`TaskStore::remove`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pending: Option<TaskId>,
}

impl DeleteConfirmation {
    /// Creates an empty protocol state.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Records a delete request, returning any request it replaced.
    pub fn request(&mut self, id: TaskId) -> Option<TaskId> {
        debug!(task_id = %id, "delete requested");
        self.pending.replace(id)
    }

    /// Returns the task awaiting confirmation.
    #[must_use]
    pub const fn pending(&self) -> Option<&TaskId> {
        self.pending.as_ref()
    }

    /// Drops the pending request without deleting anything.
    pub fn cancel(&mut self) -> Option<TaskId> {
        let cancelled = self.pending.take();
        if let Some(id) = &cancelled {
            debug!(task_id = %id, "delete cancelled");
        }
        cancelled
    }

    /// Commits the pending request.
    ///
    /// Returns `true` when a task was removed; `false` when nothing was
    /// pending or the task no longer exists.
    pub fn confirm(&mut self, store: &TaskStore) -> bool {
        self.pending.take().is_some_and(|id| store.remove(&id))
    }
}
