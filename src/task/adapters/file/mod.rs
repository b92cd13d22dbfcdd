//! Filesystem-backed storage adapter.

mod key_value;

pub use key_value::FileKeyValueStore;
