//! Task list state management and persistence.
//!
//! The [`services::TaskStore`] owns the canonical, most-recent-first list of
//! tasks and publishes an immutable snapshot after every change.
//! [`services::PersistenceSync`] seeds the store from key-value storage once
//! at startup and writes the whole list back after each user mutation,
//! never letting a late initial read overwrite newer user edits. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
