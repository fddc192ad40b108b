//! Typed identifiers for events, sessions and slices.
//!
//! Each identifier in the log has a distinct type implemented as a newtype
//! around `String`, so a slice ID can never be passed where an event ID is
//! expected.
//!
//! Freshly generated IDs are UUID v7 (time-ordered) via [`uuid::Uuid::now_v7`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Session ID recorded on events created from the command line.
pub const CLI_SESSION: &str = "cli";

fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First eight characters, used when echoing IDs to a terminal.
            #[must_use]
            pub fn short(&self) -> &str {
                crate::text::truncate_str(&self.0, 8)
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a persisted event.
    EventId
}

branded_id! {
    /// Identifier of the interactive session that produced an event.
    SessionId
}

branded_id! {
    /// Identifier of one interaction, minted by its `slice_started` event.
    SliceId
}

impl SessionId {
    /// The sentinel session used for command-line events.
    #[must_use]
    pub fn cli() -> Self {
        Self(CLI_SESSION.to_owned())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_time_ordered_uuids() {
        for raw in [EventId::new().into_inner(), SliceId::new().into_inner()] {
            let uuid = Uuid::parse_str(&raw).unwrap();
            assert_eq!(uuid.get_version_num(), 7, "{raw}");
        }
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let ids: Vec<EventId> = (0..200).map(|_| EventId::new()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn short_takes_eight_chars() {
        let id = EventId::from("0192a3b4-c5d6-7e8f");
        assert_eq!(id.short(), "0192a3b4");
        assert_eq!(EventId::from("abc").short(), "abc");
    }

    #[test]
    fn cli_session_sentinel() {
        assert_eq!(SessionId::cli().as_str(), CLI_SESSION);
    }

    #[test]
    fn display_and_deref() {
        let id = SliceId::from("display-me");
        assert_eq!(format!("{id}"), "display-me");
        let s: &str = &id;
        assert_eq!(s, "display-me");
    }

    #[test]
    fn stored_as_plain_string() {
        let slice = SliceId::from("0192-slice");
        assert_eq!(serde_json::json!({ "slice_id": slice }), serde_json::json!({ "slice_id": "0192-slice" }));
        let back: SliceId = serde_json::from_value(serde_json::json!("0192-slice")).unwrap();
        assert_eq!(back, slice);
    }
}
