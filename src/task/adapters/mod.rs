//! Adapter implementations for the key-value storage port.

pub mod file;
pub mod memory;
