//! Shared world state for task list persistence BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use tasklist::task::{
    adapters::memory::InMemoryKeyValueStore,
    domain::TaskId,
    services::{
        DeleteConfirmation, PersistenceSync, SyncConfig, SyncHandle, SyncNotice, TaskStore,
    },
};
use tokio::sync::broadcast;

/// A started task list with its persistence task.
pub struct RunningList {
    pub tasks: TaskStore,
    pub handle: SyncHandle,
    pub notices: broadcast::Receiver<SyncNotice>,
}

/// Scenario world for task list persistence behaviour tests.
pub struct PersistenceWorld {
    pub storage: InMemoryKeyValueStore,
    pub running: Option<RunningList>,
    pub confirmation: DeleteConfirmation,
}

impl PersistenceWorld {
    /// Creates a world over empty storage with no running list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: InMemoryKeyValueStore::new(),
            running: None,
            confirmation: DeleteConfirmation::new(),
        }
    }

    /// Starts a task list over the world's storage.
    pub fn start(&mut self) {
        let tasks = TaskStore::new();
        let sync = PersistenceSync::new(
            tasks.clone(),
            Arc::new(self.storage.clone()),
            SyncConfig::default(),
        );
        let notices = sync.subscribe_notices();
        self.running = Some(RunningList {
            tasks,
            handle: sync.start(),
            notices,
        });
    }

    /// Returns the running list.
    ///
    /// # Errors
    ///
    /// Returns an error if no list has been started.
    pub fn running(&self) -> Result<&RunningList, eyre::Report> {
        self.running
            .as_ref()
            .ok_or_else(|| eyre::eyre!("task list has not been started"))
    }

    /// Waits until the initial load and the latest edit have settled.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence task stopped first.
    pub fn settle(&self) -> Result<(), eyre::Report> {
        let running = self.running()?;
        let snapshot = running.tasks.snapshot();
        run_async(async {
            eyre::ensure!(
                running.handle.wait_until_ready().await,
                "persistence task ended before the initial load finished"
            );
            if snapshot.mutations() > 0 {
                eyre::ensure!(
                    running.handle.wait_for_revision(snapshot.revision()).await,
                    "persistence task ended before the latest edit settled"
                );
            }
            Ok(())
        })
    }

    /// Finds the identifier of the task showing `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if no task shows `text`.
    pub fn task_id_for(&self, text: &str) -> Result<TaskId, eyre::Report> {
        self.running()?
            .tasks
            .snapshot()
            .tasks()
            .iter()
            .find(|task| task.text().as_str() == text)
            .map(|task| task.id().clone())
            .ok_or_else(|| eyre::eyre!("no task shows {text:?}"))
    }

    /// Returns the task texts in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if no list has been started.
    pub fn texts(&self) -> Result<Vec<String>, eyre::Report> {
        Ok(self
            .running()?
            .tasks
            .snapshot()
            .tasks()
            .iter()
            .map(|task| task.text().to_string())
            .collect())
    }
}

impl Default for PersistenceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PersistenceWorld {
    PersistenceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated step argument into trimmed entries.
#[must_use]
pub fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}
