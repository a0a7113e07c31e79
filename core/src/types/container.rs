use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Extra, Labels};
use crate::filters::{FilterSet, FilterValue};

/// The container representation returned by `containers/json`.
///
/// This is smaller than what inspecting a single container returns; linked
/// containers, for one, are not included.
///
/// `Names`, `Ports`, `Labels`, `NetworkSettings` and `Mounts` are always
/// present on the wire and may be `null`; the other optional fields are
/// omitted when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    pub id: String,

    #[serde(default)]
    pub names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "ImageID", default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Creation time, in seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    #[serde(default)]
    pub ports: Option<Vec<Port>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_rw: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_root_fs: Option<i64>,

    #[serde(default)]
    pub labels: Option<Labels>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_config: Option<HostConfigSummary>,

    #[serde(default)]
    pub network_settings: Option<SummaryNetworkSettings>,

    #[serde(default)]
    pub mounts: Option<Vec<MountPoint>>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    #[serde(rename = "IP", default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(rename = "PrivatePort")]
    pub private_port: u16,

    #[serde(rename = "PublicPort", default, skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,

    /// `tcp`, `udp` or `sctp`.
    #[serde(rename = "Type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostConfigSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummaryNetworkSettings {
    #[serde(default)]
    pub networks: Option<HashMap<String, EndpointSettings>>,
}

/// Configuration of one network endpoint of a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointSettings {
    #[serde(rename = "NetworkID", default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,

    #[serde(rename = "EndpointID", default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,

    #[serde(rename = "Gateway", default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(rename = "IPAddress", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(rename = "IPPrefixLen", default, skip_serializing_if = "Option::is_none")]
    pub ip_prefix_len: Option<i64>,

    #[serde(rename = "MacAddress", default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    #[serde(rename = "Aliases", default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,

    #[serde(rename = "Links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A mount as listed on a container summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPoint {
    /// `bind`, `volume`, `tmpfs`, `npipe` or `cluster`.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Source", default)]
    pub source: String,

    #[serde(rename = "Destination", default)]
    pub destination: String,

    #[serde(rename = "Driver", default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    #[serde(rename = "Mode", default)]
    pub mode: String,

    #[serde(rename = "RW", default)]
    pub rw: bool,

    /// `rprivate`, `private`, `rshared`, `shared`, `rslave` or `slave`.
    #[serde(rename = "Propagation", default)]
    pub propagation: String,
}

/// Filters for listing containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFilters {
    pub id: Vec<String>,
    pub label: Vec<String>,
    pub name: Vec<String>,
    /// `created`, `restarting`, `running`, `removing`, `paused`, `exited` or
    /// `dead`.
    pub status: Vec<String>,
}

impl FilterSet for ContainerFilters {
    const RECOGNIZED: &'static [&'static str] = &["id", "label", "name", "status"];

    fn values(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("id", self.id.clone().into()),
            ("label", self.label.clone().into()),
            ("name", self.name.clone().into()),
            ("status", self.status.clone().into()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerListParams {
    /// Include stopped containers.
    pub all: Option<bool>,
    /// Return at most this many of the most recently created containers.
    pub limit: Option<u32>,
    /// Include `SizeRw` and `SizeRootFs`.
    pub size: Option<bool>,
    pub filters: ContainerFilters,
}
