//! Event type definitions.
//!
//! - [`EventType`]: discriminator for every persisted event type.
//! - [`EventData`]: closed per-type payload union, generated alongside [`EventType`].
//! - [`Event`] / [`NewEvent`]: a stored row and an event about to be appended.
//! - [`EntityType`]: what an event is about.
//! - [`payloads`]: the payload structs.

// `macros` must come first so the `define_events!` macro is available to
// subsequent modules.
#[macro_use]
mod macros;

pub mod base;
mod generated;
pub mod payloads;

pub use base::{EntityType, Event, NewEvent};
pub use generated::{ALL_EVENT_TYPES, EventData, EventType};
pub use payloads::{HandoffField, HandoffPayload};
