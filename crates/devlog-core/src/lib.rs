//! # devlog-core
//!
//! Foundation types shared by every devlog crate:
//!
//! - **Branded IDs**: [`EventId`], [`SessionId`], [`SliceId`] as newtypes for type safety
//! - **Text**: UTF-8 safe truncation used by the fixed payload bounds
//! - **Time**: the fixed-width timestamp format stored in the log, plus age rendering
//! - **Logging**: `tracing` subscriber setup (stderr only)
//! - **Project resolution**: working directory → project identity

#![deny(unsafe_code)]

pub mod ids;
pub mod logging;
pub mod project;
pub mod text;
pub mod time;

pub use ids::{CLI_SESSION, EventId, SessionId, SliceId};
pub use project::{GitRootLocator, RootLocator, UNKNOWN_PROJECT, resolve_project, resolve_project_with};
