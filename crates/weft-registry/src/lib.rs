//! In-memory registration database for the weft IPC fabric.
//!
//! Every process, publisher, subscriber, service server, and service client
//! participating in the fabric announces itself on the registration channel;
//! this crate aggregates those announcements into a single authoritative
//! picture and hands out immutable snapshots of it.
//!
//! Module hierarchy follows type dependency order:
//! - identity: ProcessKey, EntityKey, Revision (Layer 1)
//! - domain: EntityKind, CmdType, Severity, TimeSyncState (Layer 2)
//! - record: identity and telemetry records per kind (Layer 3)
//! - event: EntityEvent, ApplyOutcome (Layer 4)
//! - sample: Sample and payloads, the sole input (Layer 5)
//! - membership: reverse process -> entities index (Layer 6)
//! - state: RegistryState, the immutable bundle (Layer 7)
//! - apply: typed mutations over RegistryState (Layer 8)
//! - snapshot: read-only Arc handle (Layer 9)
//! - db: RegistrationDb, the single-writer engine (Layer 10)
//! - router: sample -> typed mutation dispatch (Layer 11)

#![forbid(unsafe_code)]

pub mod apply;
pub mod db;
pub mod domain;
pub mod error;
pub mod event;
pub mod identity;
pub mod membership;
pub mod record;
pub mod sample;
pub mod snapshot;
pub mod state;

mod router;

pub use db::RegistrationDb;
pub use domain::{CmdType, EntityKind, Severity, TimeSyncState};
pub use error::{InvalidCmdType, InvalidEntityKind, RegistryError};
pub use event::{ApplyOutcome, EntityEvent, EventKind};
pub use identity::{EntityKey, ProcessKey, Revision};
pub use membership::{MembershipIndex, ProcessMembers};
pub use record::{
    ClientIdentity, ClientTelemetry, DataTypeInfo, LatencyStats, ProcessIdentity, ProcessState,
    ProcessTelemetry, ServiceIdentity, ServiceTelemetry, TopicDescriptor, TopicIdentity,
    TopicTelemetry,
};
pub use sample::{
    ClientPayload, ProcessPayload, Sample, SampleIdentifier, SamplePayload, ServicePayload,
    TopicPayload,
};
pub use snapshot::Snapshot;
pub use state::RegistryState;
