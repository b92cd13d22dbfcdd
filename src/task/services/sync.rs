//! Replication of task store snapshots to key-value storage.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::task::{
    domain::{decode_list, encode_list},
    ports::KeyValueStore,
};

use super::{Snapshot, SnapshotCause, SyncConfig, SyncNotice, TaskStore};

/// Lifecycle of the initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// The initial read has not been issued.
    Uninitialized,
    /// The initial read is in flight; writes are deferred.
    Loading,
    /// The initial read finished, successfully or not; writes flow.
    Ready,
}

/// Result of [`PersistenceSync::load_initial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored under the key.
    Empty,
    /// The stored list was installed into the task store.
    Loaded {
        /// Number of tasks installed.
        tasks: usize,
    },
    /// A user mutation happened first; the stored list was dropped.
    Discarded,
    /// The stored value could not be decoded.
    DecodeFailed,
    /// The storage read failed.
    ReadFailed,
    /// The initial load had already been started.
    AlreadyStarted,
}

/// Result of [`PersistenceSync::persist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The full list was written.
    Written,
    /// The initial load has not finished; the writer re-issues later.
    Deferred,
    /// Encoding or the storage write failed.
    Failed,
}

struct SyncShared<S> {
    storage: Arc<S>,
    config: SyncConfig,
    notices: broadcast::Sender<SyncNotice>,
    phase: watch::Sender<SyncPhase>,
    settled_revision: watch::Sender<u64>,
}

/// Keeps key-value storage consistent with the latest task store snapshot.
///
/// The initial read seeds the store unless the user has already changed it.
/// Afterwards every mutated snapshot is written in full under one key.
pub struct PersistenceSync<S> {
    tasks: TaskStore,
    shared: Arc<SyncShared<S>>,
}

impl<S> Clone for PersistenceSync<S> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> PersistenceSync<S>
where
    S: KeyValueStore + 'static,
{
    /// Creates a sync bridge between `tasks` and `storage`.
    #[must_use]
    pub fn new(tasks: TaskStore, storage: Arc<S>, config: SyncConfig) -> Self {
        let (notices, _) = broadcast::channel(config.notice_capacity.max(1));
        let (phase, _) = watch::channel(SyncPhase::Uninitialized);
        let (settled_revision, _) = watch::channel(0);
        Self {
            tasks,
            shared: Arc::new(SyncShared {
                storage,
                config,
                notices,
                phase,
                settled_revision,
            }),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.shared.phase.borrow()
    }

    /// Subscribes to load and save notices.
    #[must_use]
    pub fn subscribe_notices(&self) -> broadcast::Receiver<SyncNotice> {
        self.shared.notices.subscribe()
    }

    /// Reads the stored list once and seeds the task store.
    ///
    /// Always leaves the phase at [`SyncPhase::Ready`]. A stored list that
    /// arrives after the user has already mutated the store is discarded.
    pub async fn load_initial(&self) -> LoadOutcome {
        let started = self.shared.phase.send_if_modified(|phase| {
            if *phase != SyncPhase::Uninitialized {
                return false;
            }
            *phase = SyncPhase::Loading;
            true
        });
        if !started {
            warn!("initial load requested more than once");
            return LoadOutcome::AlreadyStarted;
        }

        let key = self.shared.config.storage_key.as_str();
        debug!(storage_key = key, "reading stored task list");
        let outcome = match self.shared.storage.get(key).await {
            Ok(None) => {
                info!(storage_key = key, "no stored task list");
                LoadOutcome::Empty
            }
            Ok(Some(encoded)) => self.install(&encoded),
            Err(err) => {
                warn!(storage_key = key, error = %err, "reading stored task list failed");
                self.shared.notify(SyncNotice::LoadFailed {
                    reason: err.to_string(),
                });
                LoadOutcome::ReadFailed
            }
        };

        self.shared.phase.send_replace(SyncPhase::Ready);
        outcome
    }

    /// Writes `snapshot` in full, or defers if the initial load is pending.
    pub async fn persist(&self, snapshot: &Snapshot) -> PersistOutcome {
        self.shared.persist(snapshot).await
    }

    /// Spawns the background task: initial load, then the writer loop.
    ///
    /// The writer persists the latest mutated snapshot each time the store
    /// changes, one write at a time, and exits once every [`TaskStore`]
    /// handle (including those held by other clones of this sync) is gone.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn start(self) -> SyncHandle {
        let snapshots = self.tasks.subscribe();
        let phase = self.shared.phase.subscribe();
        let settled_revision = self.shared.settled_revision.subscribe();
        let task = tokio::spawn(async move {
            self.load_initial().await;
            let shared = Arc::clone(&self.shared);
            drop(self);
            shared.run_writer(snapshots).await;
        });
        SyncHandle {
            phase,
            settled_revision,
            task,
        }
    }

    fn install(&self, encoded: &str) -> LoadOutcome {
        let list = match decode_list(encoded) {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "stored task list is unreadable; starting empty");
                self.shared.notify(SyncNotice::LoadFailed {
                    reason: err.to_string(),
                });
                return LoadOutcome::DecodeFailed;
            }
        };

        let tasks = list.len();
        if self.tasks.load_unless_mutated(list) {
            info!(tasks, "stored task list loaded");
            LoadOutcome::Loaded { tasks }
        } else {
            info!(tasks, "stored task list discarded: user edits arrived first");
            LoadOutcome::Discarded
        }
    }
}

impl<S> SyncShared<S>
where
    S: KeyValueStore,
{
    fn notify(&self, notice: SyncNotice) {
        if self.notices.send(notice).is_err() {
            debug!("no notice subscribers");
        }
    }

    async fn persist(&self, snapshot: &Snapshot) -> PersistOutcome {
        if *self.phase.borrow() != SyncPhase::Ready {
            debug!(
                revision = snapshot.revision(),
                "write deferred until initial load completes"
            );
            return PersistOutcome::Deferred;
        }

        let outcome = match encode_list(snapshot.tasks()) {
            Ok(encoded) => self.write(snapshot, &encoded).await,
            Err(err) => {
                warn!(error = %err, "encoding task list failed");
                self.notify(SyncNotice::SaveFailed {
                    reason: err.to_string(),
                });
                PersistOutcome::Failed
            }
        };

        let revision = snapshot.revision();
        self.settled_revision.send_if_modified(|settled| {
            if revision <= *settled {
                return false;
            }
            *settled = revision;
            true
        });
        outcome
    }

    async fn write(&self, snapshot: &Snapshot, encoded: &str) -> PersistOutcome {
        let key = self.config.storage_key.as_str();
        match self.storage.set(key, encoded).await {
            Ok(()) => {
                debug!(
                    storage_key = key,
                    revision = snapshot.revision(),
                    tasks = snapshot.tasks().len(),
                    "task list written"
                );
                PersistOutcome::Written
            }
            Err(err) => {
                warn!(storage_key = key, error = %err, "writing task list failed");
                self.notify(SyncNotice::SaveFailed {
                    reason: err.to_string(),
                });
                PersistOutcome::Failed
            }
        }
    }

    async fn run_writer(&self, mut snapshots: watch::Receiver<Snapshot>) {
        let mut written = 0;
        loop {
            let snapshot = snapshots.borrow_and_update().clone();
            if snapshot.cause() == SnapshotCause::Mutated && snapshot.revision() > written {
                self.persist(&snapshot).await;
                written = snapshot.revision();
            }
            if snapshots.changed().await.is_err() {
                debug!("task store dropped; writer stopping");
                break;
            }
        }
    }
}

/// Handle to the background task started by [`PersistenceSync::start`].
#[derive(Debug)]
pub struct SyncHandle {
    phase: watch::Receiver<SyncPhase>,
    settled_revision: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Waits until the initial load has finished.
    ///
    /// Returns `false` if the background task ended before reaching
    /// [`SyncPhase::Ready`].
    pub async fn wait_until_ready(&self) -> bool {
        let mut phase = self.phase.clone();
        phase
            .wait_for(|current| *current == SyncPhase::Ready)
            .await
            .is_ok()
    }

    /// Waits until a write for `revision` or a later one has settled,
    /// whether it succeeded or failed.
    ///
    /// Returns `false` if the background task ended first.
    pub async fn wait_for_revision(&self, revision: u64) -> bool {
        let mut settled = self.settled_revision.clone();
        settled
            .wait_for(|current| *current >= revision)
            .await
            .is_ok()
    }

    /// Stops the background task without waiting for pending writes.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the background task to finish.
    ///
    /// # Errors
    ///
    /// Returns the join error if the task panicked or was aborted.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.task.await
    }
}
