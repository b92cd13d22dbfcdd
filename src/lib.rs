//! Tasklist: a persistent personal task list core.
//!
//! This crate owns the in-memory task list and keeps it synchronized with an
//! asynchronous key-value store, so that a front-end can add, complete, and
//! delete tasks without ever blocking on storage.
//!
//! # Architecture
//!
//! Tasklist follows hexagonal architecture principles:
//!
//! - **Domain**: tasks, the ordered list, and its stored JSON form
//! - **Ports**: the key-value storage and identifier generator contracts
//! - **Adapters**: in-memory and directory-backed key-value stores
//! - **Services**: the task store, its persistence bridge, and the delete
//!   confirmation protocol
//!
//! # Modules
//!
//! - [`task`]: task list state and persistence
//! - [`logging`]: tracing subscriber setup for binaries

pub mod logging;
pub mod task;
