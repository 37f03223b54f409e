//! Layer 6: Membership index
//!
//! Reverse map from a process to the entities it owns, maintained
//! synchronously with the entity tables. Buckets are never stored empty:
//! an unknown process owns the empty set, and the last member removed
//! prunes the bucket.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::EntityKind;
use super::identity::{EntityKey, ProcessKey};

/// The entities owned by one process, one set per member kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMembers {
    publishers: BTreeSet<EntityKey>,
    subscribers: BTreeSet<EntityKey>,
    servers: BTreeSet<EntityKey>,
    clients: BTreeSet<EntityKey>,
}

impl ProcessMembers {
    pub fn publishers(&self) -> &BTreeSet<EntityKey> {
        &self.publishers
    }

    pub fn subscribers(&self) -> &BTreeSet<EntityKey> {
        &self.subscribers
    }

    pub fn servers(&self) -> &BTreeSet<EntityKey> {
        &self.servers
    }

    pub fn clients(&self) -> &BTreeSet<EntityKey> {
        &self.clients
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
            && self.subscribers.is_empty()
            && self.servers.is_empty()
            && self.clients.is_empty()
    }

    pub fn len(&self) -> usize {
        self.publishers.len() + self.subscribers.len() + self.servers.len() + self.clients.len()
    }

    pub fn contains(&self, kind: EntityKind, key: EntityKey) -> bool {
        self.set(kind).is_some_and(|set| set.contains(&key))
    }

    fn set(&self, kind: EntityKind) -> Option<&BTreeSet<EntityKey>> {
        match kind {
            EntityKind::Publisher => Some(&self.publishers),
            EntityKind::Subscriber => Some(&self.subscribers),
            EntityKind::Server => Some(&self.servers),
            EntityKind::Client => Some(&self.clients),
            EntityKind::Process => None,
        }
    }

    /// Processes are not members of themselves; `Process` has no set.
    fn set_mut(&mut self, kind: EntityKind) -> Option<&mut BTreeSet<EntityKey>> {
        match kind {
            EntityKind::Publisher => Some(&mut self.publishers),
            EntityKind::Subscriber => Some(&mut self.subscribers),
            EntityKind::Server => Some(&mut self.servers),
            EntityKind::Client => Some(&mut self.clients),
            EntityKind::Process => None,
        }
    }
}

/// Reverse index: process key -> owned member keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipIndex {
    buckets: BTreeMap<ProcessKey, ProcessMembers>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members owned by `process`; the empty view for an unknown process.
    pub fn members_of(&self, process: ProcessKey) -> ProcessMembers {
        self.buckets.get(&process).cloned().unwrap_or_default()
    }

    pub fn contains(&self, process: ProcessKey, kind: EntityKind, key: EntityKey) -> bool {
        self.buckets
            .get(&process)
            .is_some_and(|members| members.contains(kind, key))
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub(crate) fn add(&mut self, process: ProcessKey, kind: EntityKind, key: EntityKey) -> bool {
        let bucket = self.buckets.entry(process).or_default();
        let Some(set) = bucket.set_mut(kind) else {
            // Process inserts have no member set; drop the bucket if this
            // call just created it.
            if bucket.is_empty() {
                self.buckets.remove(&process);
            }
            return false;
        };
        set.insert(key)
    }

    /// Removes `key` from `process`'s bucket, pruning the bucket when its
    /// last member goes.
    pub(crate) fn remove(&mut self, process: ProcessKey, kind: EntityKind, key: EntityKey) -> bool {
        let Some(members) = self.buckets.get_mut(&process) else {
            return false;
        };
        let removed = members
            .set_mut(kind)
            .is_some_and(|set| set.remove(&key));
        if members.is_empty() {
            self.buckets.remove(&process);
        }
        removed
    }

    pub(crate) fn remove_bucket(&mut self, process: ProcessKey) -> Option<ProcessMembers> {
        self.buckets.remove(&process)
    }
}
