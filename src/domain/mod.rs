//! Domain primitives for the show tracking subsystem.
//!
//! Provides newtype wrappers so catalog show ids cannot be mixed up with
//! other integer ids flowing through the system.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The external catalog's identifier for a show, used as the local dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ShowId(i32);

impl ShowId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "ShowId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ShowId> for i32 {
    fn from(id: ShowId) -> Self {
        id.0
    }
}

impl From<i32> for ShowId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for ShowId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for ShowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}
