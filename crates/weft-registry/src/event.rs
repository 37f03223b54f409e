//! Layer 4: Entity events
//!
//! One event per identity transition, produced inside the mutation itself
//! (never reconstructed by diffing states). Telemetry changes produce no
//! events.

use serde::{Deserialize, Serialize};

use super::domain::EntityKind;
use super::identity::{EntityKey, Revision};

/// What happened to an entity's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewEntity,
    UpdatedEntity,
    DeletedEntity,
}

/// A single identity transition.
///
/// Process events carry the sign-extended process key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEvent {
    pub kind: EventKind,
    pub entity: EntityKind,
    pub key: EntityKey,
}

impl EntityEvent {
    pub fn new_entity(entity: EntityKind, key: impl Into<EntityKey>) -> Self {
        Self {
            kind: EventKind::NewEntity,
            entity,
            key: key.into(),
        }
    }

    pub fn updated_entity(entity: EntityKind, key: impl Into<EntityKey>) -> Self {
        Self {
            kind: EventKind::UpdatedEntity,
            entity,
            key: key.into(),
        }
    }

    pub fn deleted_entity(entity: EntityKind, key: impl Into<EntityKey>) -> Self {
        Self {
            kind: EventKind::DeletedEntity,
            entity,
            key: key.into(),
        }
    }
}

/// Result of one apply call: the revision after the call and the events it
/// produced, in mutation order.
///
/// A no-op apply returns the unchanged current revision and no events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub revision: Revision,
    pub events: Vec<EntityEvent>,
}

impl ApplyOutcome {
    pub(crate) fn unchanged(revision: Revision) -> Self {
        Self {
            revision,
            events: Vec::new(),
        }
    }
}
