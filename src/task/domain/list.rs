//! Ordered task collection.

use super::{Task, TaskDomainError, TaskId};
use std::collections::HashSet;

/// Ordered, duplicate-free collection of tasks, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Builds a list from tasks in display order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DuplicateTaskId`] for the first identifier
    /// that appears more than once.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, TaskDomainError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id()) {
                return Err(TaskDomainError::DuplicateTaskId(task.id().clone()));
            }
        }
        Ok(Self { tasks })
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the list holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterates over the tasks in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Returns the most recently added task.
    #[must_use]
    pub fn first(&self) -> Option<&Task> {
        self.tasks.first()
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns `true` when a task with the identifier exists.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Counts completed tasks.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed()).count()
    }

    /// Counts tasks that are still open.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.len() - self.completed_count()
    }

    /// Inserts a task at the head of the list.
    ///
    /// Callers guarantee the identifier is not already present.
    pub(crate) fn prepend(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Flips the completion flag of the matching task.
    pub(crate) fn toggle(&mut self, id: &TaskId) -> bool {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .map(Task::toggle)
            .is_some()
    }

    /// Removes the matching task, keeping the order of the rest.
    pub(crate) fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        self.tasks.len() != before
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
