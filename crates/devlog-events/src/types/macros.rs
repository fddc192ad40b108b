/// Declarative macro generating `EventType`, `EventData`, `ALL_EVENT_TYPES`,
/// wire-format helpers, domain groups, and typed payload decoding from a
/// single source of truth.
///
/// # Sections
///
/// - **`events`**: `Variant => "wire_name" => PayloadType` rows. The payload
///   type must implement `Serialize` + `DeserializeOwned`.
/// - **`domain_groups`**: Named boolean methods grouping variants.
macro_rules! define_events {
    (
        events {
            $(
                $(#[doc = $doc:literal])*
                $variant:ident => $wire:literal => $payload_ty:ty
            ),* $(,)?
        }
        domain_groups {
            $(
                $(#[doc = $gdoc:literal])*
                $method:ident => [$($gv:ident),* $(,)?]
            ),* $(,)?
        }
    ) => {
        // ── EventType enum ──────────────────────────────────────────

        /// Discriminator for every persisted event type.
        ///
        /// Each variant serializes to its wire string (e.g. `"slice_started"`),
        /// which is also the value of the `event_type` column.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum EventType {
            $(
                $(#[doc = $doc])*
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        // ── ALL_EVENT_TYPES constant ────────────────────────────────

        /// All event type variants in definition order.
        pub const ALL_EVENT_TYPES: [EventType; { [$($wire,)*].len() }] = [
            $(EventType::$variant,)*
        ];

        // ── EventType methods ───────────────────────────────────────

        impl EventType {
            /// Canonical wire string (e.g. `"work_queued"`).
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                }
            }

            // ── Domain group methods ────────────────────────────────

            $(
                $(#[doc = $gdoc])*
                #[must_use]
                pub fn $method(self) -> bool {
                    matches!(self, $(Self::$gv)|*)
                }
            )*
        }

        impl std::fmt::Display for EventType {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for EventType {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)*
                    _ => Err(format!("unknown event type: {s}")),
                }
            }
        }

        // ── EventData enum ──────────────────────────────────────────

        /// Closed per-type payload, keyed by [`EventType`].
        ///
        /// Stored as JSON text in the `data` column; the variant is recovered
        /// from the `event_type` column on read.
        #[derive(Clone, Debug, PartialEq)]
        pub enum EventData {
            $(
                $(#[doc = $doc])*
                $variant($payload_ty),
            )*
        }

        impl EventData {
            /// The event type this payload belongs to.
            #[must_use]
            pub fn event_type(&self) -> EventType {
                match self {
                    $(Self::$variant(_) => EventType::$variant,)*
                }
            }

            /// Serialize the payload body (without the discriminator).
            pub fn to_value(&self) -> std::result::Result<serde_json::Value, serde_json::Error> {
                match self {
                    $(Self::$variant(p) => serde_json::to_value(p),)*
                }
            }

            /// Decode a stored payload body for the given type.
            pub fn from_value(
                event_type: EventType,
                value: serde_json::Value,
            ) -> std::result::Result<Self, serde_json::Error> {
                match event_type {
                    $(
                        EventType::$variant => Ok(Self::$variant(serde_json::from_value(value)?)),
                    )*
                }
            }
        }

        $(
            impl From<$payload_ty> for EventData {
                fn from(payload: $payload_ty) -> Self {
                    Self::$variant(payload)
                }
            }
        )*
    };
}
