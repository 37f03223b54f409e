//! Layer 8: Typed mutations
//!
//! Every mutation runs against a private clone of the current bundle, compares
//! the proposed value against the stored one before writing, appends events
//! for identity transitions, and reports whether it changed anything. The
//! caller publishes the clone only when `changed` comes back true, so an
//! idempotent re-announcement costs a clone but not a revision.

use std::collections::BTreeMap;

use super::domain::EntityKind;
use super::event::EntityEvent;
use super::identity::{EntityKey, ProcessKey};
use super::membership::MembershipIndex;
use super::record::{
    ClientIdentity, ClientTelemetry, ProcessIdentity, ProcessTelemetry, ServiceIdentity,
    ServiceTelemetry, TopicIdentity, TopicTelemetry,
};
use super::state::RegistryState;

/// Identity records owned by a process.
trait OwnedIdentity: Clone + PartialEq {
    fn process_id(&self) -> ProcessKey;
}

impl OwnedIdentity for TopicIdentity {
    fn process_id(&self) -> ProcessKey {
        self.process_id
    }
}

impl OwnedIdentity for ServiceIdentity {
    fn process_id(&self) -> ProcessKey {
        self.process_id
    }
}

impl OwnedIdentity for ClientIdentity {
    fn process_id(&self) -> ProcessKey {
        self.process_id
    }
}

/// Insert or update a member entity (anything but a process).
///
/// A new key joins its owner's membership bucket and emits `new_entity`. An
/// existing key is overwritten only when the identity actually differs; a
/// changed owner moves the key between buckets first.
fn add_or_update_member<R: OwnedIdentity>(
    table: &mut BTreeMap<EntityKey, R>,
    membership: &mut MembershipIndex,
    kind: EntityKind,
    key: EntityKey,
    identity: R,
    events: &mut Vec<EntityEvent>,
) -> bool {
    match table.get_mut(&key) {
        None => {
            membership.add(identity.process_id(), kind, key);
            table.insert(key, identity);
            events.push(EntityEvent::new_entity(kind, key));
            true
        }
        Some(existing) if *existing != identity => {
            if existing.process_id() != identity.process_id() {
                membership.remove(existing.process_id(), kind, key);
                membership.add(identity.process_id(), kind, key);
            }
            *existing = identity;
            events.push(EntityEvent::updated_entity(kind, key));
            true
        }
        Some(_) => false,
    }
}

/// Remove a member entity: membership first (using the owner recorded in the
/// identity table, not any bucket it happens to sit in), then both records.
/// Absent keys are silently ignored.
fn remove_member<R: OwnedIdentity, T>(
    table: &mut BTreeMap<EntityKey, R>,
    telemetry: &mut BTreeMap<EntityKey, T>,
    membership: &mut MembershipIndex,
    kind: EntityKind,
    key: EntityKey,
    events: &mut Vec<EntityEvent>,
) -> bool {
    let Some(identity) = table.remove(&key) else {
        return false;
    };
    membership.remove(identity.process_id(), kind, key);
    telemetry.remove(&key);
    events.push(EntityEvent::deleted_entity(kind, key));
    true
}

/// Insert or overwrite a telemetry record when the proposed tuple differs.
fn update_telemetry<K: Ord + Copy, T: PartialEq>(
    table: &mut BTreeMap<K, T>,
    key: K,
    telemetry: T,
) -> bool {
    match table.get_mut(&key) {
        Some(existing) if *existing == telemetry => false,
        Some(existing) => {
            *existing = telemetry;
            true
        }
        None => {
            table.insert(key, telemetry);
            true
        }
    }
}

pub(crate) fn add_or_update_process(
    state: &mut RegistryState,
    key: ProcessKey,
    identity: ProcessIdentity,
    events: &mut Vec<EntityEvent>,
) -> bool {
    match state.processes.get_mut(&key) {
        None => {
            state.processes.insert(key, identity);
            events.push(EntityEvent::new_entity(EntityKind::Process, key));
            true
        }
        Some(existing) if *existing != identity => {
            *existing = identity;
            events.push(EntityEvent::updated_entity(EntityKind::Process, key));
            true
        }
        Some(_) => false,
    }
}

pub(crate) fn update_process_telemetry(
    state: &mut RegistryState,
    key: ProcessKey,
    telemetry: ProcessTelemetry,
) -> bool {
    debug_assert!(
        state.processes.contains_key(&key),
        "telemetry for unregistered process {key}"
    );
    update_telemetry(&mut state.process_telemetry, key, telemetry)
}

/// Remove a process and everything it owns.
///
/// The member sets are snapshotted up front; each member's bucket removal
/// reads the owner from its identity record rather than assuming the bucket
/// key, so a member that migrated owners without a full reconciliation is
/// still cleaned up everywhere. One `deleted_entity` per member, the process
/// last. A process without members (or without a registration at all) still
/// has its telemetry and bucket erased.
pub(crate) fn remove_process(
    state: &mut RegistryState,
    key: ProcessKey,
    events: &mut Vec<EntityEvent>,
) -> bool {
    let mut changed = false;
    let members = state.membership.members_of(key);

    for id in members.publishers() {
        changed |= remove_member(
            &mut state.publishers,
            &mut state.publisher_telemetry,
            &mut state.membership,
            EntityKind::Publisher,
            *id,
            events,
        );
    }
    for id in members.subscribers() {
        changed |= remove_member(
            &mut state.subscribers,
            &mut state.subscriber_telemetry,
            &mut state.membership,
            EntityKind::Subscriber,
            *id,
            events,
        );
    }
    for id in members.servers() {
        changed |= remove_member(
            &mut state.servers,
            &mut state.server_telemetry,
            &mut state.membership,
            EntityKind::Server,
            *id,
            events,
        );
    }
    for id in members.clients() {
        changed |= remove_member(
            &mut state.clients,
            &mut state.client_telemetry,
            &mut state.membership,
            EntityKind::Client,
            *id,
            events,
        );
    }

    if state.processes.remove(&key).is_some() {
        events.push(EntityEvent::deleted_entity(EntityKind::Process, key));
        changed = true;
    }
    state.process_telemetry.remove(&key);
    state.membership.remove_bucket(key);
    changed
}

pub(crate) fn add_or_update_publisher(
    state: &mut RegistryState,
    key: EntityKey,
    identity: TopicIdentity,
    events: &mut Vec<EntityEvent>,
) -> bool {
    add_or_update_member(
        &mut state.publishers,
        &mut state.membership,
        EntityKind::Publisher,
        key,
        identity,
        events,
    )
}

pub(crate) fn update_publisher_telemetry(
    state: &mut RegistryState,
    key: EntityKey,
    telemetry: TopicTelemetry,
) -> bool {
    debug_assert!(
        state.publishers.contains_key(&key),
        "telemetry for unregistered publisher {key}"
    );
    update_telemetry(&mut state.publisher_telemetry, key, telemetry)
}

pub(crate) fn remove_publisher(
    state: &mut RegistryState,
    key: EntityKey,
    events: &mut Vec<EntityEvent>,
) -> bool {
    remove_member(
        &mut state.publishers,
        &mut state.publisher_telemetry,
        &mut state.membership,
        EntityKind::Publisher,
        key,
        events,
    )
}

pub(crate) fn add_or_update_subscriber(
    state: &mut RegistryState,
    key: EntityKey,
    identity: TopicIdentity,
    events: &mut Vec<EntityEvent>,
) -> bool {
    add_or_update_member(
        &mut state.subscribers,
        &mut state.membership,
        EntityKind::Subscriber,
        key,
        identity,
        events,
    )
}

pub(crate) fn update_subscriber_telemetry(
    state: &mut RegistryState,
    key: EntityKey,
    telemetry: TopicTelemetry,
) -> bool {
    debug_assert!(
        state.subscribers.contains_key(&key),
        "telemetry for unregistered subscriber {key}"
    );
    update_telemetry(&mut state.subscriber_telemetry, key, telemetry)
}

pub(crate) fn remove_subscriber(
    state: &mut RegistryState,
    key: EntityKey,
    events: &mut Vec<EntityEvent>,
) -> bool {
    remove_member(
        &mut state.subscribers,
        &mut state.subscriber_telemetry,
        &mut state.membership,
        EntityKind::Subscriber,
        key,
        events,
    )
}

pub(crate) fn add_or_update_server(
    state: &mut RegistryState,
    key: EntityKey,
    identity: ServiceIdentity,
    events: &mut Vec<EntityEvent>,
) -> bool {
    add_or_update_member(
        &mut state.servers,
        &mut state.membership,
        EntityKind::Server,
        key,
        identity,
        events,
    )
}

pub(crate) fn update_server_telemetry(
    state: &mut RegistryState,
    key: EntityKey,
    telemetry: ServiceTelemetry,
) -> bool {
    debug_assert!(
        state.servers.contains_key(&key),
        "telemetry for unregistered server {key}"
    );
    update_telemetry(&mut state.server_telemetry, key, telemetry)
}

pub(crate) fn remove_server(
    state: &mut RegistryState,
    key: EntityKey,
    events: &mut Vec<EntityEvent>,
) -> bool {
    remove_member(
        &mut state.servers,
        &mut state.server_telemetry,
        &mut state.membership,
        EntityKind::Server,
        key,
        events,
    )
}

pub(crate) fn add_or_update_client(
    state: &mut RegistryState,
    key: EntityKey,
    identity: ClientIdentity,
    events: &mut Vec<EntityEvent>,
) -> bool {
    add_or_update_member(
        &mut state.clients,
        &mut state.membership,
        EntityKind::Client,
        key,
        identity,
        events,
    )
}

pub(crate) fn update_client_telemetry(
    state: &mut RegistryState,
    key: EntityKey,
    telemetry: ClientTelemetry,
) -> bool {
    debug_assert!(
        state.clients.contains_key(&key),
        "telemetry for unregistered client {key}"
    );
    update_telemetry(&mut state.client_telemetry, key, telemetry)
}

pub(crate) fn remove_client(
    state: &mut RegistryState,
    key: EntityKey,
    events: &mut Vec<EntityEvent>,
) -> bool {
    remove_member(
        &mut state.clients,
        &mut state.client_telemetry,
        &mut state.membership,
        EntityKind::Client,
        key,
        events,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::record::TopicDescriptor;

    fn topic_identity(process: i32, host: &str, topic: &str) -> TopicIdentity {
        TopicIdentity {
            process_id: ProcessKey::new(process),
            host_name: host.into(),
            topic: TopicDescriptor {
                name: topic.into(),
                ..TopicDescriptor::default()
            },
        }
    }

    #[test]
    fn re_announcing_the_same_identity_changes_nothing() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        let identity = topic_identity(1, "host", "topic");

        assert!(add_or_update_publisher(
            &mut state,
            EntityKey::new(9),
            identity.clone(),
            &mut events
        ));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::NewEntity);

        events.clear();
        assert!(!add_or_update_publisher(
            &mut state,
            EntityKey::new(9),
            identity,
            &mut events
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn identity_change_emits_updated_entity() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        add_or_update_publisher(
            &mut state,
            EntityKey::new(9),
            topic_identity(1, "host", "topic"),
            &mut events,
        );

        events.clear();
        assert!(add_or_update_publisher(
            &mut state,
            EntityKey::new(9),
            topic_identity(1, "host", "renamed"),
            &mut events
        ));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::UpdatedEntity);
        assert_eq!(events[0].entity, EntityKind::Publisher);
    }

    #[test]
    fn owner_migration_moves_membership() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        let key = EntityKey::new(7);

        add_or_update_publisher(&mut state, key, topic_identity(1, "h", "t"), &mut events);
        assert!(state
            .membership
            .contains(ProcessKey::new(1), EntityKind::Publisher, key));

        events.clear();
        assert!(add_or_update_publisher(
            &mut state,
            key,
            topic_identity(2, "h", "t"),
            &mut events
        ));
        assert!(!state
            .membership
            .contains(ProcessKey::new(1), EntityKind::Publisher, key));
        assert!(state
            .membership
            .contains(ProcessKey::new(2), EntityKind::Publisher, key));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::UpdatedEntity);
    }

    #[test]
    fn removing_an_absent_entity_is_silent() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        assert!(!remove_publisher(&mut state, EntityKey::new(5), &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn telemetry_compare_is_over_the_full_tuple() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        add_or_update_publisher(
            &mut state,
            EntityKey::new(5),
            topic_identity(1, "h", "t"),
            &mut events,
        );

        let telemetry = TopicTelemetry {
            registration_clock: 5,
            ..TopicTelemetry::default()
        };
        assert!(update_publisher_telemetry(
            &mut state,
            EntityKey::new(5),
            telemetry.clone()
        ));
        assert!(!update_publisher_telemetry(
            &mut state,
            EntityKey::new(5),
            telemetry.clone()
        ));

        let mut ticked = telemetry;
        ticked.data_clock = 1;
        assert!(update_publisher_telemetry(&mut state, EntityKey::new(5), ticked));
    }

    #[test]
    fn server_telemetry_compares_registration_clock_only() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        add_or_update_server(
            &mut state,
            EntityKey::new(12),
            ServiceIdentity {
                process_id: ProcessKey::new(1),
                host_name: "h".into(),
                service_name: "svc".into(),
            },
            &mut events,
        );

        assert!(update_server_telemetry(
            &mut state,
            EntityKey::new(12),
            ServiceTelemetry {
                registration_clock: 1
            }
        ));
        assert!(!update_server_telemetry(
            &mut state,
            EntityKey::new(12),
            ServiceTelemetry {
                registration_clock: 1
            }
        ));
        assert!(update_server_telemetry(
            &mut state,
            EntityKey::new(12),
            ServiceTelemetry {
                registration_clock: 2
            }
        ));
    }

    #[test]
    fn cascade_removes_every_member_and_the_process_last() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        let process = ProcessKey::new(1001);

        add_or_update_process(
            &mut state,
            process,
            ProcessIdentity {
                process_name: "proc_a".into(),
                host_name: "host_a".into(),
            },
            &mut events,
        );
        add_or_update_publisher(
            &mut state,
            EntityKey::new(10),
            topic_identity(1001, "host_a", "topic_foo"),
            &mut events,
        );
        add_or_update_subscriber(
            &mut state,
            EntityKey::new(11),
            topic_identity(1001, "host_a", "topic_foo"),
            &mut events,
        );

        events.clear();
        assert!(remove_process(&mut state, process, &mut events));

        let kinds: Vec<_> = events.iter().map(|e| (e.kind, e.entity)).collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::DeletedEntity, EntityKind::Publisher),
                (EventKind::DeletedEntity, EntityKind::Subscriber),
                (EventKind::DeletedEntity, EntityKind::Process),
            ]
        );
        assert_eq!(state.process_count(), 0);
        assert_eq!(state.publisher_count(), 0);
        assert_eq!(state.subscriber_count(), 0);
        assert!(state.membership.is_empty());
        assert!(state.get_publisher_telemetry(EntityKey::new(10)).is_none());
    }

    #[test]
    fn cascade_reads_the_owner_from_the_record() {
        // Craft the inconsistency the read-before-delete pattern defends
        // against: the bucket says process 1 owns key 7, the record says
        // process 2 does.
        let mut state = RegistryState::new();
        let key = EntityKey::new(7);
        state
            .publishers
            .insert(key, topic_identity(2, "h", "t"));
        state
            .membership
            .add(ProcessKey::new(1), EntityKind::Publisher, key);
        state
            .membership
            .add(ProcessKey::new(2), EntityKind::Publisher, key);

        let mut events = Vec::new();
        assert!(remove_process(&mut state, ProcessKey::new(1), &mut events));

        assert!(!state.has_publisher(key));
        assert!(!state
            .membership
            .contains(ProcessKey::new(2), EntityKind::Publisher, key));
        assert!(state.membership.is_empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity, EntityKind::Publisher);
    }

    #[test]
    fn cascade_without_members_still_removes_the_process() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        add_or_update_process(
            &mut state,
            ProcessKey::new(4),
            ProcessIdentity::default(),
            &mut events,
        );

        events.clear();
        assert!(remove_process(&mut state, ProcessKey::new(4), &mut events));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity, EntityKind::Process);
        assert_eq!(events[0].kind, EventKind::DeletedEntity);
    }

    #[test]
    fn cascade_of_an_unknown_process_changes_nothing() {
        let mut state = RegistryState::new();
        let mut events = Vec::new();
        assert!(!remove_process(&mut state, ProcessKey::new(99), &mut events));
        assert!(events.is_empty());
    }
}
