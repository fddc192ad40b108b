//! `SQLite` backend for the event store.
//!
//! # Architecture
//!
//! - **[`connection`]**: one connection per invocation with WAL mode, busy
//!   timeout and an idempotent `CREATE ... IF NOT EXISTS` schema.
//! - **[`row_types`]**: raw database row structs for `rusqlite` row mapping.
//! - **[`repositories`]**: stateless repository structs. Each method takes
//!   `&Connection` and executes SQL. No shared mutable state.

pub mod connection;
pub mod repositories;
pub mod row_types;

pub use connection::{ConnectionConfig, PragmaState, verify_pragmas};
pub use repositories::event::{EventQuery, Order};
pub use row_types::{EventRow, FileActivityRow, WindowStats};
