//! GUID-backed identifiers for items and templates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! guid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Build an identifier from its 128-bit value
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Generate a fresh random identifier
            pub fn new_random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        /// Accepts plain, hyphenated, braced (`{...}`) and URN forms.
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        /// Formats as an upper-case braced GUID, e.g. `{AB86861A-6030-46C5-B394-E8F99E8B87DB}`.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{{{:X}}}", self.0)
            }
        }
    };
}

guid_id!(
    /// Identifier of a content item
    ItemId
);

guid_id!(
    /// Identifier of a template definition
    TemplateId
);

/// The template every template definition item is built from.
///
/// Items of this template are structural and never subject to the custom policy.
pub const STANDARD_TEMPLATE_ID: TemplateId =
    TemplateId::from_u128(0xAB86861A_6030_46C5_B394_E8F99E8B87DB);
