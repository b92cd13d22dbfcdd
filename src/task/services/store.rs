//! Authoritative in-memory task list with change notification.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::task::{
    domain::{Task, TaskId, TaskList, TaskText},
    ports::{IdGenerator, UuidIdGenerator},
};

/// Candidate identifiers drawn before `add` gives up on a generator that
/// keeps colliding with the live list.
const MAX_ID_ATTEMPTS: usize = 16;

/// What produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotCause {
    /// The empty list the store was created with.
    Initial,
    /// A wholesale replacement through [`TaskStore::load`].
    Loaded,
    /// A user mutation: add, toggle, or remove.
    Mutated,
}

/// Immutable view of the task list at one revision.
///
/// Cloning a snapshot is cheap and shares the list. A snapshot never changes
/// after it has been published; later mutations produce a new list.
#[derive(Debug, Clone)]
pub struct Snapshot {
    list: Arc<TaskList>,
    revision: u64,
    cause: SnapshotCause,
    mutations: u64,
}

impl Snapshot {
    fn initial() -> Self {
        Self {
            list: Arc::new(TaskList::new()),
            revision: 0,
            cause: SnapshotCause::Initial,
            mutations: 0,
        }
    }

    /// Returns the task list.
    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        &self.list
    }

    /// Returns the shared handle to the task list.
    #[must_use]
    pub fn list(&self) -> Arc<TaskList> {
        Arc::clone(&self.list)
    }

    /// Returns the revision; every published change increments it.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns what produced this snapshot.
    #[must_use]
    pub const fn cause(&self) -> SnapshotCause {
        self.cause
    }

    /// Returns how many user mutations the store had applied at this point.
    #[must_use]
    pub const fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Returns `true` when both snapshots share the same list allocation.
    #[must_use]
    pub fn shares_list_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.list, &other.list)
    }

    fn advance(&mut self, cause: SnapshotCause) {
        self.revision += 1;
        self.cause = cause;
        if cause == SnapshotCause::Mutated {
            self.mutations += 1;
        }
    }
}

/// Owner of the canonical task list.
///
/// Construct one store per process and hand clones of the handle to the
/// presentation layer and to [`super::PersistenceSync`]. Every mutation runs
/// to completion under the channel lock and publishes a new [`Snapshot`];
/// operations that change nothing publish nothing.
#[derive(Clone)]
pub struct TaskStore {
    snapshots: Arc<watch::Sender<Snapshot>>,
    ids: Arc<dyn IdGenerator>,
}

impl TaskStore {
    /// Creates an empty store with random identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidIdGenerator))
    }

    /// Creates an empty store drawing identifiers from `ids`.
    #[must_use]
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::initial());
        Self {
            snapshots: Arc::new(snapshots),
            ids,
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to snapshot changes.
    ///
    /// The receiver always yields the latest snapshot; intermediate ones may
    /// be skipped by a slow subscriber.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Adds a task at the head of the list.
    ///
    /// Returns the new identifier, or `None` when `text` is blank after
    /// trimming (nothing changes in that case).
    pub fn add(&self, text: &str) -> Option<TaskId> {
        let Ok(task_text) = TaskText::new(text) else {
            debug!("add ignored: blank task text");
            return None;
        };

        let mut created = None;
        self.snapshots.send_if_modified(|snapshot| {
            let Some(id) = self.fresh_id(snapshot.tasks()) else {
                return false;
            };
            Arc::make_mut(&mut snapshot.list).prepend(Task::new(id.clone(), task_text));
            snapshot.advance(SnapshotCause::Mutated);
            debug!(task_id = %id, revision = snapshot.revision, "task added");
            created = Some(id);
            true
        });
        created
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// Returns `false` and changes nothing when no task matches.
    pub fn toggle_complete(&self, id: &TaskId) -> bool {
        self.snapshots.send_if_modified(|snapshot| {
            if !snapshot.tasks().contains(id) {
                debug!(task_id = %id, "toggle ignored: unknown task");
                return false;
            }
            Arc::make_mut(&mut snapshot.list).toggle(id);
            snapshot.advance(SnapshotCause::Mutated);
            debug!(task_id = %id, revision = snapshot.revision, "task toggled");
            true
        })
    }

    /// Removes the task with `id`.
    ///
    /// The caller is responsible for any confirmation step. Returns `false`
    /// and changes nothing when no task matches.
    pub fn remove(&self, id: &TaskId) -> bool {
        self.snapshots.send_if_modified(|snapshot| {
            if !snapshot.tasks().contains(id) {
                debug!(task_id = %id, "remove ignored: unknown task");
                return false;
            }
            Arc::make_mut(&mut snapshot.list).remove(id);
            snapshot.advance(SnapshotCause::Mutated);
            debug!(task_id = %id, revision = snapshot.revision, "task removed");
            true
        })
    }

    /// Replaces the whole list.
    ///
    /// The resulting snapshot is marked [`SnapshotCause::Loaded`] and is
    /// never written back to storage.
    pub fn load(&self, list: TaskList) {
        self.snapshots.send_modify(|snapshot| {
            snapshot.list = Arc::new(list);
            snapshot.advance(SnapshotCause::Loaded);
            debug!(
                tasks = snapshot.list.len(),
                revision = snapshot.revision,
                "task list loaded"
            );
        });
    }

    /// Replaces the whole list only if no user mutation has happened yet.
    ///
    /// Returns `false` when the list was left untouched because user edits
    /// already exist.
    pub fn load_unless_mutated(&self, list: TaskList) -> bool {
        self.snapshots.send_if_modified(|snapshot| {
            if snapshot.mutations > 0 {
                return false;
            }
            snapshot.list = Arc::new(list);
            snapshot.advance(SnapshotCause::Loaded);
            true
        })
    }

    fn fresh_id(&self, list: &TaskList) -> Option<TaskId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !list.contains(&candidate) {
                return Some(candidate);
            }
            warn!(task_id = %candidate, "generated task id collides with live list");
        }
        error!(
            attempts = MAX_ID_ATTEMPTS,
            "could not generate a unique task id"
        );
        None
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("TaskStore")
            .field("revision", &snapshot.revision)
            .field("tasks", &snapshot.list.len())
            .finish_non_exhaustive()
    }
}
