//! Port contracts for the task list.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod id_generator;
pub mod storage;

pub use id_generator::{IdGenerator, UuidIdGenerator};
pub use storage::{KeyValueStore, StorageError, StorageResult};
