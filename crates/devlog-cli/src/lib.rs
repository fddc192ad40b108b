//! # devlog-cli
//!
//! The `devlog` binary as a library, so command flows can be driven from
//! tests with an injected runtime, stdin and stdout.
//!
//! - **Hook path** ([`hook`]): records one host payload, never fails the host
//! - **Session-start path** ([`session_start`]): prints resumable context
//! - **Command surface** ([`commands`]): human queries and work-queue writes

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod errors;
pub mod hook;
pub mod render;
pub mod runtime;
pub mod session_start;

pub use cli::{Cli, Command};
pub use errors::{CliError, exit_code};
pub use runtime::Runtime;
