//! Record identifiers
//!
//! Every table is keyed by a v7 UUID. [`TypedUuid`] tags one with the record it names, so a user
//! UUID cannot be handed to a query expecting a product.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

pub struct TypedUuid<Record> {
    raw: Uuid,
    record: PhantomData<fn() -> Record>,
}

impl<Record> TypedUuid<Record> {
    /// Mint an identifier for a row about to be inserted.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    pub const fn from_uuid(raw: Uuid) -> Self {
        Self {
            raw,
            record: PhantomData,
        }
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.raw
    }
}

macro_rules! forward_fmt {
    ($($fmt:ident),+) => {
        $(
            impl<Record> fmt::$fmt for TypedUuid<Record> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::$fmt::fmt(&self.raw, f)
                }
            }
        )+
    };
}

forward_fmt!(Debug, Display);

impl<Record> Default for TypedUuid<Record> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Record> Copy for TypedUuid<Record> {}

impl<Record> Clone for TypedUuid<Record> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Record> Eq for TypedUuid<Record> {}

impl<Record> PartialEq for TypedUuid<Record> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<Record> Ord for TypedUuid<Record> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<Record> PartialOrd for TypedUuid<Record> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Record> Hash for TypedUuid<Record> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<Record> From<Uuid> for TypedUuid<Record> {
    fn from(raw: Uuid) -> Self {
        Self::from_uuid(raw)
    }
}

impl<Record> From<TypedUuid<Record>> for Uuid {
    fn from(typed: TypedUuid<Record>) -> Self {
        typed.raw
    }
}

impl<Record> FromStr for TypedUuid<Record> {
    type Err = uuid::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input.parse::<Uuid>().map(Self::from_uuid)
    }
}

impl<Record> Serialize for TypedUuid<Record> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, Record> Deserialize<'de> for TypedUuid<Record> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}
