//! Shared helpers for session integration tests.

use std::sync::Arc;

use eyre::WrapErr;
use rstest::fixture;
use tasklist::task::{
    adapters::memory::InMemoryKeyValueStore,
    domain::{TaskList, decode_list},
    ports::KeyValueStore,
    services::{
        DEFAULT_STORAGE_KEY, PersistenceSync, SyncConfig, SyncHandle, SyncNotice, TaskStore,
    },
};
use tokio::sync::broadcast;

/// Provides a fresh in-memory storage backend for each test.
#[fixture]
pub fn storage() -> InMemoryKeyValueStore {
    InMemoryKeyValueStore::new()
}

/// A running task list: the store, its persistence task, and its notices.
pub struct Session {
    pub tasks: TaskStore,
    pub handle: SyncHandle,
    pub notices: broadcast::Receiver<SyncNotice>,
}

/// Starts a session over `storage` without waiting for the initial load.
pub fn start_session<S>(storage: Arc<S>) -> Session
where
    S: KeyValueStore + 'static,
{
    let tasks = TaskStore::new();
    let sync = PersistenceSync::new(tasks.clone(), storage, SyncConfig::default());
    let notices = sync.subscribe_notices();
    Session {
        tasks,
        handle: sync.start(),
        notices,
    }
}

/// Starts a session and waits until its initial load has finished.
///
/// # Errors
///
/// Returns an error if the persistence task stops before becoming ready.
pub async fn open_session<S>(storage: Arc<S>) -> eyre::Result<Session>
where
    S: KeyValueStore + 'static,
{
    let session = start_session(storage);
    eyre::ensure!(
        session.handle.wait_until_ready().await,
        "persistence task ended before the initial load finished"
    );
    Ok(session)
}

impl Session {
    /// Waits until the latest user edit has been written (or has failed).
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence task stops first.
    pub async fn flush(&self) -> eyre::Result<()> {
        eyre::ensure!(
            self.handle.wait_until_ready().await,
            "persistence task ended before the initial load finished"
        );
        let snapshot = self.tasks.snapshot();
        if snapshot.mutations() > 0 {
            eyre::ensure!(
                self.handle.wait_for_revision(snapshot.revision()).await,
                "persistence task ended before revision {} settled",
                snapshot.revision()
            );
        }
        Ok(())
    }

    /// Flushes pending writes and shuts the session down.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails or the persistence task panicked.
    pub async fn close(self) -> eyre::Result<()> {
        self.flush().await?;
        let Self { tasks, handle, .. } = self;
        drop(tasks);
        handle.join().await.wrap_err("join persistence task")
    }

    /// Returns the task texts in display order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.tasks
            .snapshot()
            .tasks()
            .iter()
            .map(|task| task.text().to_string())
            .collect()
    }
}

/// Decodes the list currently held under the default key.
///
/// # Errors
///
/// Returns an error if nothing is stored or the value does not decode.
pub fn stored_list(storage: &InMemoryKeyValueStore) -> eyre::Result<TaskList> {
    let encoded = storage
        .value(DEFAULT_STORAGE_KEY)
        .wrap_err("peek storage")?
        .ok_or_else(|| eyre::eyre!("nothing stored under {DEFAULT_STORAGE_KEY}"))?;
    decode_list(&encoded).wrap_err("decode stored list")
}
