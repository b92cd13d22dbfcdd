//! Application services: the task store, its persistence bridge, and the
//! delete confirmation protocol.

mod config;
mod confirm;
mod notice;
mod store;
mod sync;

pub use config::{DEFAULT_STORAGE_KEY, STORAGE_KEY_ENV, SyncConfig};
pub use confirm::DeleteConfirmation;
pub use notice::SyncNotice;
pub use store::{Snapshot, SnapshotCause, TaskStore};
pub use sync::{LoadOutcome, PersistOutcome, PersistenceSync, SyncHandle, SyncPhase};
