//! In-memory key-value store with failure injection and read gating.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::task::ports::{KeyValueStore, StorageError, StorageResult};

/// Thread-safe in-memory key-value store.
///
/// Besides plain storage, the store can be told to fail reads or writes and
/// to hold reads until released, which lets tests reproduce slow platform
/// storage deterministically.
#[derive(Debug, Clone)]
pub struct InMemoryKeyValueStore {
    state: Arc<RwLock<InMemoryState>>,
    reads_open: Arc<watch::Sender<bool>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    values: HashMap<String, String>,
    writes: Vec<(String, String)>,
    fail_reads: bool,
    fail_writes: bool,
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        let (reads_open, _) = watch::channel(true);
        Self {
            state: Arc::default(),
            reads_open: Arc::new(reads_open),
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::io(std::io::Error::other(err.to_string()))
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.values.insert(key.into(), value.into());
        }
        store
    }

    /// Returns the current value under `key` without going through the port.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when lock acquisition fails.
    pub fn value(&self, key: &str) -> StorageResult<Option<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.values.get(key).cloned())
    }

    /// Returns every successful write in the order it landed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when lock acquisition fails.
    pub fn writes(&self) -> StorageResult<Vec<(String, String)>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.writes.clone())
    }

    /// Makes subsequent reads fail until reset.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when lock acquisition fails.
    pub fn set_fail_reads(&self, fail: bool) -> StorageResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.fail_reads = fail;
        Ok(())
    }

    /// Makes subsequent writes fail until reset.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when lock acquisition fails.
    pub fn set_fail_writes(&self, fail: bool) -> StorageResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.fail_writes = fail;
        Ok(())
    }

    /// Blocks reads until [`Self::release_reads`] is called.
    pub fn hold_reads(&self) {
        self.reads_open.send_replace(false);
    }

    /// Lets held and future reads proceed.
    pub fn release_reads(&self) {
        self.reads_open.send_replace(true);
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut reads_open = self.reads_open.subscribe();
        let released = reads_open.wait_for(|open| *open).await.is_ok();
        if !released {
            return Err(lock_error("read gate closed"));
        }

        let state = self.state.read().map_err(lock_error)?;
        if state.fail_reads {
            return Err(StorageError::io(std::io::Error::other(
                "injected read failure",
            )));
        }
        Ok(state.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.fail_writes {
            return Err(StorageError::io(std::io::Error::other(
                "injected write failure",
            )));
        }
        state.values.insert(key.to_owned(), value.to_owned());
        state.writes.push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}
