//! Repository implementations for `SQLite` database operations.
//!
//! Each repository is a stateless struct whose methods take a `&Connection`
//! parameter. This makes every operation a pure function from
//! (connection, input) → output, trivially testable in isolation.

pub mod activity;
pub mod event;
pub mod work;

use crate::types::{ALL_EVENT_TYPES, EventType};

/// SQL `IN` list of the wire names of every event type matching `group`.
///
/// Wire names are compile-time literals, so inlining them is safe.
pub(crate) fn type_list(group: fn(EventType) -> bool) -> String {
    ALL_EVENT_TYPES
        .iter()
        .copied()
        .filter(|t| group(*t))
        .map(|t| format!("'{}'", t.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_change_list() {
        assert_eq!(type_list(EventType::is_file_change), "'file_created', 'file_modified'");
        assert_eq!(type_list(EventType::is_work_item), "'work_queued', 'work_blocked'");
    }
}
