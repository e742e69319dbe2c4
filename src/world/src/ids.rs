//! Stable integer identities shared across registries.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// An actor living in the scene world
    ActorId,
    "actor"
);
id_type!(
    /// An item owned by the item registry
    ItemId,
    "item"
);
id_type!(
    /// A puzzle owned by the puzzle registry
    PuzzleId,
    "puzzle"
);
id_type!(
    /// A registered collision box
    ColliderHandle,
    "collider"
);
