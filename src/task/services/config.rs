//! Configuration for persistence synchronization.

/// Storage key used by earlier releases; kept so saved lists keep loading.
pub const DEFAULT_STORAGE_KEY: &str = "@MeuTodoList:todos";

/// Environment variable overriding [`SyncConfig::storage_key`].
pub const STORAGE_KEY_ENV: &str = "TASKLIST_STORAGE_KEY";

const DEFAULT_NOTICE_CAPACITY: usize = 16;

/// Settings for [`super::PersistenceSync`].
///
/// # Examples
///
/// ```
/// use tasklist::task::services::{DEFAULT_STORAGE_KEY, SyncConfig};
///
/// let config = SyncConfig::default();
/// assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
///
/// let custom = SyncConfig::default().with_storage_key("tasks:v1");
/// assert_eq!(custom.storage_key, "tasks:v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Key under which the encoded list is stored.
    pub storage_key: String,
    /// Buffered notices per subscriber before the oldest are dropped.
    pub notice_capacity: usize,
}

impl SyncConfig {
    /// Builds a configuration from defaults and the process environment.
    ///
    /// A blank [`STORAGE_KEY_ENV`] value is ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(STORAGE_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => config.with_storage_key(key.trim()),
            _ => config,
        }
    }

    /// Sets the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the notice channel capacity; zero is raised to one.
    #[must_use]
    pub fn with_notice_capacity(mut self, capacity: usize) -> Self {
        self.notice_capacity = capacity.max(1);
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            notice_capacity: DEFAULT_NOTICE_CAPACITY,
        }
    }
}
