//! Non-fatal persistence notices for the presentation layer.

/// A recoverable persistence problem worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotice {
    /// Saved tasks could not be read or decoded; the list started empty.
    LoadFailed {
        /// Diagnostic detail for logs.
        reason: String,
    },
    /// The latest list could not be written; in-memory state is unaffected.
    SaveFailed {
        /// Diagnostic detail for logs.
        reason: String,
    },
}

impl SyncNotice {
    /// Returns the short message shown to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "could not load saved tasks",
            Self::SaveFailed { .. } => "could not save tasks",
        }
    }

    /// Returns the diagnostic detail.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::LoadFailed { reason } | Self::SaveFailed { reason } => reason,
        }
    }
}
