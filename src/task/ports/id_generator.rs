//! Identifier source for newly created tasks.

use crate::task::domain::TaskId;
use uuid::Uuid;

/// Produces candidate identifiers for new tasks.
///
/// Candidates only need to be statistically unique; the task store rejects
/// and redraws any candidate already present in the live list.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh candidate identifier.
    fn next_id(&self) -> TaskId;
}

/// Random identifiers from version 4 UUIDs in their 32-character hex form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> TaskId {
        TaskId::from_uuid(Uuid::new_v4())
    }
}
