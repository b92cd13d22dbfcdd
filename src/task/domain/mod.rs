//! Domain model for the task list.
//!
//! Tasks, their identifiers and text, the ordered list aggregate, and the
//! encoded form used for durable storage. Nothing here performs I/O.

mod codec;
mod error;
mod ids;
mod list;
mod task;

pub use codec::{decode_list, encode_list};
pub use error::{DecodeError, TaskDomainError};
pub use ids::{TaskId, TaskText};
pub use list::TaskList;
pub use task::Task;
