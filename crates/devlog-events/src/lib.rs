//! # devlog-events
//!
//! Append-only event log with a `SQLite` backend, one file per project.
//!
//! - **Event types**: 13 variants generated by `define_events!`, each with a typed payload
//! - **Store**: [`ProjectStore`] appends and queries one project's log; [`StoreRegistry`] maps projects to files
//! - **Classifier**: tool action records → canonical events, or nothing for noise
//! - **Derivations**: current slice, work queue status and resumable context, all recomputed from the log on read
//! - **Handoffs**: structured summaries recorded for the next session
//! - **Ingestion**: hook payloads decoded once into [`HookMessage`] and applied with [`ingest::record`]
//! - **Views**: read-only summaries behind the command surface

#![deny(unsafe_code)]

pub mod classify;
pub mod context;
pub mod errors;
pub mod handoff;
pub mod ingest;
pub mod slice;
pub mod sqlite;
pub mod store;
pub mod types;
pub mod views;
pub mod work_queue;

pub use devlog_core::{EventId, SessionId, SliceId};
pub use errors::{EventStoreError, Result};
pub use ingest::{DispatchOutcome, DropReason, HookMessage};
pub use sqlite::{ConnectionConfig, EventQuery, Order};
pub use store::{ProjectStore, StoreRegistry};
pub use types::{EntityType, Event, EventData, EventType, NewEvent};
