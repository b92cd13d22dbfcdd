//! Encoded form of a task list in durable storage.
//!
//! The stored value is a JSON array of `{"id", "text", "completed"}`
//! objects in display order. There is no schema version: anything that does
//! not match this shape exactly is reported as a [`DecodeError`].

use super::{DecodeError, Task, TaskList};

/// Serializes the whole list to its stored JSON form.
///
/// # Errors
///
/// Returns the serializer error; with the current record shape this only
/// happens on allocation failure inside `serde_json`.
pub fn encode_list(list: &TaskList) -> serde_json::Result<String> {
    serde_json::to_string(list.as_slice())
}

/// Parses a stored JSON value back into a task list.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] when the value is not a JSON array of
/// task records, and [`DecodeError::Invalid`] when the records break a list
/// invariant such as identifier uniqueness.
pub fn decode_list(encoded: &str) -> Result<TaskList, DecodeError> {
    let tasks: Vec<Task> = serde_json::from_str(encoded)?;
    Ok(TaskList::from_tasks(tasks)?)
}
