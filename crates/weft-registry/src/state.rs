//! Layer 7: Registry state
//!
//! The immutable bundle published to readers: the revision, one identity and
//! one telemetry table per entity kind, and the membership index. The writer
//! clones the whole bundle, mutates the clone, and swaps it in; a published
//! bundle is never touched again.
//!
//! INVARIANTS (hold at every published revision):
//! - membership and the identity tables agree in both directions;
//! - a telemetry record exists only alongside its identity record;
//! - membership buckets are never empty;
//! - `revision` counts the state-changing mutations since construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identity::{EntityKey, ProcessKey, Revision};
use super::membership::{MembershipIndex, ProcessMembers};
use super::record::{
    ClientIdentity, ClientTelemetry, ProcessIdentity, ProcessTelemetry, ServiceIdentity,
    ServiceTelemetry, TopicIdentity, TopicTelemetry,
};

/// One immutable snapshot bundle of everything the fabric has announced.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistryState {
    revision: Revision,

    pub(crate) processes: BTreeMap<ProcessKey, ProcessIdentity>,
    pub(crate) process_telemetry: BTreeMap<ProcessKey, ProcessTelemetry>,

    pub(crate) publishers: BTreeMap<EntityKey, TopicIdentity>,
    pub(crate) publisher_telemetry: BTreeMap<EntityKey, TopicTelemetry>,

    pub(crate) subscribers: BTreeMap<EntityKey, TopicIdentity>,
    pub(crate) subscriber_telemetry: BTreeMap<EntityKey, TopicTelemetry>,

    pub(crate) servers: BTreeMap<EntityKey, ServiceIdentity>,
    pub(crate) server_telemetry: BTreeMap<EntityKey, ServiceTelemetry>,

    pub(crate) clients: BTreeMap<EntityKey, ClientIdentity>,
    pub(crate) client_telemetry: BTreeMap<EntityKey, ClientTelemetry>,

    pub(crate) membership: MembershipIndex,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub(crate) fn set_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }

    pub fn has_process(&self, key: ProcessKey) -> bool {
        self.processes.contains_key(&key)
    }

    pub fn has_publisher(&self, key: EntityKey) -> bool {
        self.publishers.contains_key(&key)
    }

    pub fn has_subscriber(&self, key: EntityKey) -> bool {
        self.subscribers.contains_key(&key)
    }

    pub fn has_server(&self, key: EntityKey) -> bool {
        self.servers.contains_key(&key)
    }

    pub fn has_client(&self, key: EntityKey) -> bool {
        self.clients.contains_key(&key)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn publisher_count(&self) -> usize {
        self.publishers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn get_process_identity(&self, key: ProcessKey) -> Option<&ProcessIdentity> {
        self.processes.get(&key)
    }

    pub fn get_process_telemetry(&self, key: ProcessKey) -> Option<&ProcessTelemetry> {
        self.process_telemetry.get(&key)
    }

    pub fn get_publisher_identity(&self, key: EntityKey) -> Option<&TopicIdentity> {
        self.publishers.get(&key)
    }

    pub fn get_publisher_telemetry(&self, key: EntityKey) -> Option<&TopicTelemetry> {
        self.publisher_telemetry.get(&key)
    }

    pub fn get_subscriber_identity(&self, key: EntityKey) -> Option<&TopicIdentity> {
        self.subscribers.get(&key)
    }

    pub fn get_subscriber_telemetry(&self, key: EntityKey) -> Option<&TopicTelemetry> {
        self.subscriber_telemetry.get(&key)
    }

    pub fn get_server_identity(&self, key: EntityKey) -> Option<&ServiceIdentity> {
        self.servers.get(&key)
    }

    pub fn get_server_telemetry(&self, key: EntityKey) -> Option<&ServiceTelemetry> {
        self.server_telemetry.get(&key)
    }

    pub fn get_client_identity(&self, key: EntityKey) -> Option<&ClientIdentity> {
        self.clients.get(&key)
    }

    pub fn get_client_telemetry(&self, key: EntityKey) -> Option<&ClientTelemetry> {
        self.client_telemetry.get(&key)
    }

    pub fn processes(&self) -> impl Iterator<Item = (ProcessKey, &ProcessIdentity)> {
        self.processes.iter().map(|(key, identity)| (*key, identity))
    }

    pub fn publishers(&self) -> impl Iterator<Item = (EntityKey, &TopicIdentity)> {
        self.publishers.iter().map(|(key, identity)| (*key, identity))
    }

    pub fn subscribers(&self) -> impl Iterator<Item = (EntityKey, &TopicIdentity)> {
        self.subscribers
            .iter()
            .map(|(key, identity)| (*key, identity))
    }

    pub fn servers(&self) -> impl Iterator<Item = (EntityKey, &ServiceIdentity)> {
        self.servers.iter().map(|(key, identity)| (*key, identity))
    }

    pub fn clients(&self) -> impl Iterator<Item = (EntityKey, &ClientIdentity)> {
        self.clients.iter().map(|(key, identity)| (*key, identity))
    }

    /// Members owned by `process`; the empty view for an unknown process.
    pub fn members_of(&self, process: ProcessKey) -> ProcessMembers {
        self.membership.members_of(process)
    }
}
