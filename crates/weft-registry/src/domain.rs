//! Layer 2: Domain enums
//!
//! EntityKind: process, publisher, subscriber, server, client
//! CmdType: registration channel command vocabulary
//! Severity / TimeSyncState: process run-state atoms

use serde::{Deserialize, Serialize};

use super::error::{InvalidCmdType, InvalidEntityKind, RegistryError};

/// Kind of a registered entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Process,
    Publisher,
    Subscriber,
    Server,
    Client,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Process => "process",
            EntityKind::Publisher => "publisher",
            EntityKind::Subscriber => "subscriber",
            EntityKind::Server => "server",
            EntityKind::Client => "client",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        match raw.trim() {
            "process" => Ok(EntityKind::Process),
            "publisher" => Ok(EntityKind::Publisher),
            "subscriber" => Ok(EntityKind::Subscriber),
            "server" => Ok(EntityKind::Server),
            "client" => Ok(EntityKind::Client),
            _ => Err(InvalidEntityKind {
                raw: raw.to_string(),
            }
            .into()),
        }
    }
}

/// Command carried by a registration sample.
///
/// `None` and `SetSample` are data-plane leftovers the database ignores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmdType {
    #[default]
    None,
    RegProcess,
    UnregProcess,
    RegPublisher,
    UnregPublisher,
    RegSubscriber,
    UnregSubscriber,
    RegService,
    UnregService,
    RegClient,
    UnregClient,
    SetSample,
}

impl CmdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmdType::None => "none",
            CmdType::RegProcess => "reg_process",
            CmdType::UnregProcess => "unreg_process",
            CmdType::RegPublisher => "reg_publisher",
            CmdType::UnregPublisher => "unreg_publisher",
            CmdType::RegSubscriber => "reg_subscriber",
            CmdType::UnregSubscriber => "unreg_subscriber",
            CmdType::RegService => "reg_service",
            CmdType::UnregService => "unreg_service",
            CmdType::RegClient => "reg_client",
            CmdType::UnregClient => "unreg_client",
            CmdType::SetSample => "set_sample",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        match raw.trim() {
            "none" => Ok(CmdType::None),
            "reg_process" => Ok(CmdType::RegProcess),
            "unreg_process" => Ok(CmdType::UnregProcess),
            "reg_publisher" => Ok(CmdType::RegPublisher),
            "unreg_publisher" => Ok(CmdType::UnregPublisher),
            "reg_subscriber" => Ok(CmdType::RegSubscriber),
            "unreg_subscriber" => Ok(CmdType::UnregSubscriber),
            "reg_service" => Ok(CmdType::RegService),
            "unreg_service" => Ok(CmdType::UnregService),
            "reg_client" => Ok(CmdType::RegClient),
            "unreg_client" => Ok(CmdType::UnregClient),
            "set_sample" => Ok(CmdType::SetSample),
            _ => Err(InvalidCmdType {
                raw: raw.to_string(),
            }
            .into()),
        }
    }
}

/// Run-state severity reported by a process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Unknown,
    Healthy,
    Warning,
    Critical,
    Failed,
}

/// Time synchronization mode a process runs under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSyncState {
    #[default]
    None,
    Realtime,
    Replay,
}
