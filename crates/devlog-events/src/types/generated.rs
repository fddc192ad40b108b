//! Event type definitions.
//!
//! All definitions are produced by [`define_events!`] from the table below.
//! Add or remove events by editing the macro invocation.

use serde::{Deserialize, Serialize};

use super::payloads::{
    CommandExecutedPayload, FileCreatedPayload, FileModifiedPayload, HandoffPayload,
    ResourceFetchedPayload, SessionStoppedPayload, SliceStartedPayload, TaskSpawnedPayload,
    TodosUpdatedPayload, WebSearchedPayload, WorkBlockedPayload, WorkCompletedPayload,
    WorkQueuedPayload,
};

define_events! {
    events {
        /// A new interaction began.
        SliceStarted => "slice_started" => SliceStartedPayload,
        /// A file was written from scratch.
        FileCreated => "file_created" => FileCreatedPayload,
        /// A file was edited in place.
        FileModified => "file_modified" => FileModifiedPayload,
        /// A shell command ran.
        CommandExecuted => "command_executed" => CommandExecutedPayload,
        /// A URL was fetched.
        ResourceFetched => "resource_fetched" => ResourceFetchedPayload,
        /// A web search ran.
        WebSearched => "web_searched" => WebSearchedPayload,
        /// A subtask was spawned.
        TaskSpawned => "task_spawned" => TaskSpawnedPayload,
        /// The todo list changed.
        TodosUpdated => "todos_updated" => TodosUpdatedPayload,
        /// The interactive session ended.
        SessionStopped => "session_stopped" => SessionStoppedPayload,
        /// A work item was queued.
        WorkQueued => "work_queued" => WorkQueuedPayload,
        /// A work item was recorded as blocked.
        WorkBlocked => "work_blocked" => WorkBlockedPayload,
        /// A work item was completed.
        WorkCompleted => "work_completed" => WorkCompletedPayload,
        /// A structured summary left for the next session.
        SessionHandoff => "session_handoff" => HandoffPayload,
    }
    domain_groups {
        /// Whether this event is derived from an assistant action.
        is_action => [
            FileCreated, FileModified, CommandExecuted, ResourceFetched,
            WebSearched, TaskSpawned, TodosUpdated,
        ],
        /// Whether this event touched a file.
        is_file_change => [FileCreated, FileModified],
        /// Whether this event creates a work item.
        is_work_item => [WorkQueued, WorkBlocked],
    }
}
