//! Layer 5: Registration samples
//!
//! A `Sample` is the database's sole input: one decoded message from the
//! fabric's registration channel announcing or retracting an entity. The
//! database compares the identity-relevant fields and treats everything else
//! as opaque telemetry.

use serde::{Deserialize, Serialize};

use super::domain::{CmdType, TimeSyncState};
use super::identity::{EntityKey, ProcessKey};
use super::record::{
    ClientIdentity, ClientTelemetry, DataTypeInfo, LatencyStats, ProcessIdentity, ProcessState,
    ServiceIdentity, ServiceTelemetry, TopicDescriptor, TopicIdentity, TopicTelemetry,
};

/// Who the sample is about.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleIdentifier {
    pub entity_id: EntityKey,
    pub process_id: ProcessKey,
    pub host_name: String,
}

/// Process announcement payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPayload {
    pub process_name: String,
    pub state: ProcessState,
    pub time_sync_state: TimeSyncState,
}

/// Publisher/subscriber announcement payload: topic identity plus the
/// telemetry tuple, flat as it travels on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicPayload {
    pub topic_name: String,
    pub datatype: DataTypeInfo,
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

/// Service server announcement payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePayload {
    pub service_name: String,
    pub registration_clock: i32,
}

/// Service client announcement payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    pub service_name: String,
    pub registration_clock: i32,
}

/// Payload variant carried by a sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePayload {
    #[default]
    None,
    Process(ProcessPayload),
    Topic(TopicPayload),
    Service(ServicePayload),
    Client(ClientPayload),
}

/// One decoded registration-channel message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub cmd_type: CmdType,
    pub identifier: SampleIdentifier,
    pub payload: SamplePayload,
}

impl ProcessPayload {
    pub fn identity(&self, identifier: &SampleIdentifier) -> ProcessIdentity {
        ProcessIdentity {
            process_name: self.process_name.clone(),
            host_name: identifier.host_name.clone(),
        }
    }
}

impl TopicPayload {
    pub fn identity(&self, identifier: &SampleIdentifier) -> TopicIdentity {
        TopicIdentity {
            process_id: identifier.process_id,
            host_name: identifier.host_name.clone(),
            topic: TopicDescriptor {
                name: self.topic_name.clone(),
                datatype: self.datatype.clone(),
            },
        }
    }

    pub fn telemetry(&self) -> TopicTelemetry {
        TopicTelemetry {
            registration_clock: self.registration_clock,
            topic_size: self.topic_size,
            connections_local: self.connections_local,
            connections_external: self.connections_external,
            message_drops: self.message_drops,
            data_id: self.data_id,
            data_clock: self.data_clock,
            data_frequency: self.data_frequency,
            latency_us: self.latency_us,
        }
    }
}

impl ServicePayload {
    pub fn identity(&self, identifier: &SampleIdentifier) -> ServiceIdentity {
        ServiceIdentity {
            process_id: identifier.process_id,
            host_name: identifier.host_name.clone(),
            service_name: self.service_name.clone(),
        }
    }

    pub fn telemetry(&self) -> ServiceTelemetry {
        ServiceTelemetry {
            registration_clock: self.registration_clock,
        }
    }
}

impl ClientPayload {
    pub fn identity(&self, identifier: &SampleIdentifier) -> ClientIdentity {
        ClientIdentity {
            process_id: identifier.process_id,
            host_name: identifier.host_name.clone(),
            service_name: self.service_name.clone(),
        }
    }

    pub fn telemetry(&self) -> ClientTelemetry {
        ClientTelemetry {
            registration_clock: self.registration_clock,
        }
    }
}
