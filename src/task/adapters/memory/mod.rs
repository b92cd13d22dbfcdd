//! In-memory adapters for tests and embedding.

mod key_value;

pub use key_value::InMemoryKeyValueStore;
