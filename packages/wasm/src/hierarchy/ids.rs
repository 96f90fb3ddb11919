//! Stable identifiers for the three hierarchy levels.
//!
//! Ids come straight from the hierarchy provider. They wrap a u32 for
//! cheap hashing and WebAssembly interop, and serialize as plain numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! hierarchy_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Create an id from a raw u32.
            #[inline]
            pub fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw u32 value.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

hierarchy_id!(
    /// Top-level grouping id.
    AreaId,
    "Area"
);

hierarchy_id!(
    /// Mid-level grouping id; every project belongs to one area.
    ProjectId,
    "Project"
);

hierarchy_id!(
    /// Leaf id; every member belongs to one project.
    MemberId,
    "Member"
);
