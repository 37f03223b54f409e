//! Layer 10: Registration database
//!
//! The single-writer engine. One mutex serializes every mutation; a mutation
//! clones the current bundle, runs a typed mutation against the clone, and
//! publishes the clone only if something changed. Readers take the lock only
//! for the instant it takes to clone the `Arc` handle; queries on a snapshot
//! never contend with writers.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use super::apply;
use super::event::{ApplyOutcome, EntityEvent};
use super::identity::{EntityKey, ProcessKey, Revision};
use super::record::{
    ClientIdentity, ClientTelemetry, ProcessIdentity, ProcessTelemetry, ServiceIdentity,
    ServiceTelemetry, TopicIdentity, TopicTelemetry,
};
use super::snapshot::Snapshot;
use super::state::RegistryState;

struct DbInner {
    current: Arc<RegistryState>,
    previous_revision: Revision,
}

/// In-memory authority over everything announced on the registration channel.
///
/// Pure in-memory: rebuilt from re-announcements on restart, local to one
/// host, no persistence and no transport of its own.
pub struct RegistrationDb {
    inner: Mutex<DbInner>,
}

impl RegistrationDb {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DbInner {
                current: Arc::new(RegistryState::new()),
                previous_revision: Revision::ZERO,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DbInner> {
        self.inner.lock().expect("registration db lock poisoned")
    }

    /// Clone-mutate-swap. The closure runs with the lock held and must not
    /// block; it reports whether it altered the clone.
    fn apply_mutation(
        &self,
        mutate: impl FnOnce(&mut RegistryState, &mut Vec<EntityEvent>) -> bool,
    ) -> ApplyOutcome {
        let mut inner = self.lock();
        let mut next = RegistryState::clone(&inner.current);
        let mut events = Vec::new();

        if !mutate(&mut next, &mut events) {
            return ApplyOutcome {
                revision: inner.current.revision(),
                events,
            };
        }

        inner.previous_revision = inner.current.revision();
        next.set_revision(inner.previous_revision.next());
        inner.current = Arc::new(next);

        let revision = inner.current.revision();
        drop(inner);
        trace!(%revision, events = events.len(), "mutation committed");
        ApplyOutcome { revision, events }
    }

    pub fn add_or_update_process(
        &self,
        key: ProcessKey,
        identity: ProcessIdentity,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, events| {
            apply::add_or_update_process(state, key, identity, events)
        })
    }

    pub fn update_process_telemetry(
        &self,
        key: ProcessKey,
        telemetry: ProcessTelemetry,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, _| apply::update_process_telemetry(state, key, telemetry))
    }

    pub fn remove_process(&self, key: ProcessKey) -> ApplyOutcome {
        self.apply_mutation(|state, events| apply::remove_process(state, key, events))
    }

    pub fn add_or_update_publisher(
        &self,
        key: EntityKey,
        identity: TopicIdentity,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, events| {
            apply::add_or_update_publisher(state, key, identity, events)
        })
    }

    pub fn update_publisher_telemetry(
        &self,
        key: EntityKey,
        telemetry: TopicTelemetry,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, _| apply::update_publisher_telemetry(state, key, telemetry))
    }

    pub fn remove_publisher(&self, key: EntityKey) -> ApplyOutcome {
        self.apply_mutation(|state, events| apply::remove_publisher(state, key, events))
    }

    pub fn add_or_update_subscriber(
        &self,
        key: EntityKey,
        identity: TopicIdentity,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, events| {
            apply::add_or_update_subscriber(state, key, identity, events)
        })
    }

    pub fn update_subscriber_telemetry(
        &self,
        key: EntityKey,
        telemetry: TopicTelemetry,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, _| apply::update_subscriber_telemetry(state, key, telemetry))
    }

    pub fn remove_subscriber(&self, key: EntityKey) -> ApplyOutcome {
        self.apply_mutation(|state, events| apply::remove_subscriber(state, key, events))
    }

    pub fn add_or_update_server(&self, key: EntityKey, identity: ServiceIdentity) -> ApplyOutcome {
        self.apply_mutation(|state, events| {
            apply::add_or_update_server(state, key, identity, events)
        })
    }

    pub fn update_server_telemetry(
        &self,
        key: EntityKey,
        telemetry: ServiceTelemetry,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, _| apply::update_server_telemetry(state, key, telemetry))
    }

    pub fn remove_server(&self, key: EntityKey) -> ApplyOutcome {
        self.apply_mutation(|state, events| apply::remove_server(state, key, events))
    }

    pub fn add_or_update_client(&self, key: EntityKey, identity: ClientIdentity) -> ApplyOutcome {
        self.apply_mutation(|state, events| {
            apply::add_or_update_client(state, key, identity, events)
        })
    }

    pub fn update_client_telemetry(
        &self,
        key: EntityKey,
        telemetry: ClientTelemetry,
    ) -> ApplyOutcome {
        self.apply_mutation(|state, _| apply::update_client_telemetry(state, key, telemetry))
    }

    pub fn remove_client(&self, key: EntityKey) -> ApplyOutcome {
        self.apply_mutation(|state, events| apply::remove_client(state, key, events))
    }

    /// Read-only view of the currently published bundle.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(Arc::clone(&self.lock().current))
    }

    pub fn current_revision(&self) -> Revision {
        self.lock().current.revision()
    }

    /// Revision before the last committed mutation; zero until the first
    /// commit.
    pub fn previous_revision(&self) -> Revision {
        self.lock().previous_revision
    }
}

impl Default for RegistrationDb {
    fn default() -> Self {
        Self::new()
    }
}
