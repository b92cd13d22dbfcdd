//! Key-value storage port used to persist the encoded task list.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for key-value storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Asynchronous string key-value storage contract.
///
/// Implementations replace values wholesale; there are no partial updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing platform fails.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing platform fails.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Errors returned by key-value storage implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The key is not usable by this backend.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Transport or platform failure.
    #[error("storage I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps a backend error.
    #[must_use]
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
