//! Layer 1: Identity atoms
//!
//! ProcessKey: a process on the local host
//! EntityKey: any non-process entity (publisher, subscriber, server, client)
//! Revision: total order over committed mutations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a process on the local host.
///
/// Assigned by the fabric; the database treats it as opaque.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessKey(i32);

impl ProcessKey {
    pub fn new(key: i32) -> Self {
        Self(key)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for ProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessKey({})", self.0)
    }
}

impl fmt::Display for ProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProcessKey {
    fn from(key: i32) -> Self {
        Self(key)
    }
}

impl From<ProcessKey> for i32 {
    fn from(key: ProcessKey) -> i32 {
        key.0
    }
}

/// Key of a non-process entity.
///
/// Unique across entity kinds within a revision; the kind is carried by the
/// table an entity lives in, never by the key itself.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(u64);

impl EntityKey {
    pub fn new(key: u64) -> Self {
        Self(key)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityKey({})", self.0)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityKey {
    fn from(key: u64) -> Self {
        Self(key)
    }
}

impl From<EntityKey> for u64 {
    fn from(key: EntityKey) -> u64 {
        key.0
    }
}

/// Sign-extending conversion used when a process appears in an event stream
/// keyed by `EntityKey`.
impl From<ProcessKey> for EntityKey {
    fn from(key: ProcessKey) -> Self {
        Self(key.0 as u64)
    }
}

/// Revision counter over committed mutations.
///
/// Starts at zero and advances by exactly one per state-changing mutation;
/// idempotent re-announcements do not advance it.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    pub const ZERO: Revision = Revision(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Revision {
        Revision(
            self.0
                .checked_add(1)
                .expect("revision overflow computing next"),
        )
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Revision({})", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Revision> for u64 {
    fn from(revision: Revision) -> u64 {
        revision.0
    }
}
