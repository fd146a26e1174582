//! Typed identifiers and the id supply

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

uuid_id! {
    /// Identifies a whole project.
    ProjectId
}

uuid_id! {
    /// Identifies a block within a project.
    BlockId
}

uuid_id! {
    /// Identifies a shared file within a project.
    FileId
}

uuid_id! {
    /// Identifies a relationship edge within a project.
    RelationshipId
}

/// Supplies fresh uuids to every operation that mints ids.
///
/// Injected rather than called ambiently so remapping and lifting are
/// reproducible under test.
pub trait IdSource {
    fn next(&mut self) -> Uuid;
}

/// Production supply: random v4 uuids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic supply: counting uuids starting at 1.
#[derive(Debug, Clone)]
pub struct SequenceIdSource {
    next: u128,
}

impl SequenceIdSource {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_at(value: u128) -> Self {
        Self { next: value }
    }
}

impl Default for SequenceIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequenceIdSource {
    fn next(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next);
        self.next += 1;
        id
    }
}
