//! Layer 3: Table records
//!
//! Two records per entity kind: an identity record (slow-changing, compared
//! before every overwrite, drives events) and a telemetry record
//! (fast-changing, never produces events). The split is a contract, not an
//! optimization; merging the two would make telemetry ticks observable as
//! entity updates.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::domain::{Severity, TimeSyncState};
use super::identity::ProcessKey;

/// Datatype description of a topic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeInfo {
    pub name: String,
    pub encoding: String,
    /// Opaque schema blob (e.g. a serialized descriptor set); equality over
    /// the raw bytes.
    #[serde(default, skip_serializing_if = "Bytes::is_empty")]
    pub descriptor: Bytes,
}

/// Identity of a topic as announced by its endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDescriptor {
    pub name: String,
    pub datatype: DataTypeInfo,
}

/// Latency statistics in microseconds, as accumulated by the announcing side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub latest: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Run state reported by a process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessState {
    pub severity: Severity,
    pub info: String,
}

/// Identity record of a process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessIdentity {
    pub process_name: String,
    pub host_name: String,
}

/// Telemetry record of a process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessTelemetry {
    pub state: ProcessState,
    pub time_sync_state: TimeSyncState,
}

/// Identity record of a publisher or subscriber.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicIdentity {
    pub process_id: ProcessKey,
    pub host_name: String,
    pub topic: TopicDescriptor,
}

/// Telemetry record of a publisher or subscriber.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicTelemetry {
    pub registration_clock: i32,
    pub topic_size: i32,
    pub connections_local: i32,
    pub connections_external: i32,
    pub message_drops: i32,
    pub data_id: i64,
    pub data_clock: i64,
    pub data_frequency: i32,
    pub latency_us: LatencyStats,
}

/// Identity record of a service server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdentity {
    pub process_id: ProcessKey,
    pub host_name: String,
    pub service_name: String,
}

/// Telemetry record of a service server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTelemetry {
    pub registration_clock: i32,
}

/// Identity record of a service client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub process_id: ProcessKey,
    pub host_name: String,
    pub service_name: String,
}

/// Telemetry record of a service client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTelemetry {
    pub registration_clock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_identity_equality_ignores_nothing() {
        let a = TopicIdentity {
            process_id: ProcessKey::new(1),
            host_name: "host".into(),
            topic: TopicDescriptor {
                name: "topic".into(),
                datatype: DataTypeInfo {
                    name: "demo::Type".into(),
                    encoding: "proto".into(),
                    descriptor: Bytes::from_static(b"\x01\x02"),
                },
            },
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.topic.datatype.descriptor = Bytes::from_static(b"\x01\x03");
        assert_ne!(a, b);
    }

    #[test]
    fn topic_telemetry_equality_is_field_by_field() {
        let a = TopicTelemetry {
            registration_clock: 1,
            latency_us: LatencyStats {
                latest: 12.0,
                ..LatencyStats::default()
            },
            ..TopicTelemetry::default()
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.latency_us.latest = 13.0;
        assert_ne!(a, b);
        b.latency_us.latest = 12.0;
        b.data_clock = 9;
        assert_ne!(a, b);
    }
}
