//! Tracing subscriber setup for binaries embedding the task list.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the host. [`init_tracing`] is the default used by the bundled
//! console front-end.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_FILTER_ENV: &str = "TASKLIST_LOG";

const DEFAULT_FILTER: &str = "info";

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directives could not be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directives.
        filter: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `tasklist=debug`.
    pub filter: String,
    /// Whether to colour output.
    pub ansi: bool,
}

impl LogConfig {
    /// Reads the filter from [`LOG_FILTER_ENV`], falling back to `info`.
    #[must_use]
    pub fn from_env() -> Self {
        let filter = std::env::var(LOG_FILTER_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned());
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Sets the filter directives.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enables or disables coloured output.
    #[must_use]
    pub const fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.filter).map_err(|err| LoggingError::InvalidFilter {
            filter: self.filter.clone(),
            reason: err.to_string(),
        })
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            ansi: false,
        }
    }
}

/// Installs a global fmt subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] for unparsable directives and
/// [`LoggingError::AlreadyInitialized`] when another global subscriber is
/// already set.
pub fn init_tracing(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = config.env_filter()?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))?;
    tracing::debug!(filter = %config.filter, "tracing initialized");
    Ok(())
}
