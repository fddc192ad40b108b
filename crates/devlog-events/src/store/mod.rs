//! Store handles.
//!
//! A [`ProjectStore`] owns one connection to one project's log. The
//! [`StoreRegistry`] maps project identities to backing files and opens
//! stores on demand.

mod event_store;
mod registry;

pub use event_store::ProjectStore;
pub use registry::StoreRegistry;
