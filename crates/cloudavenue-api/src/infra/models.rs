// InfraAPI wire types
//
// Request and response bodies of the proprietary `/api/customers/` surface.
// Field names follow the upstream camelCase JSON; everything the server may
// omit is `#[serde(default)]`.

use serde::{Deserialize, Serialize};

// ── Jobs ────────────────────────────────────────────────────────────

/// Handle returned by every job-driven mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub job_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One element of the `GET /jobs/{jobId}` array.
///
/// The server omits `jobId` from the body; callers re-stamp it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusRecord {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub actions: Vec<JobAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: String,
}

// ── Edge gateways ───────────────────────────────────────────────────

/// InfraAPI view of an edge gateway: ownership, uplink, and rate limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub edge_id: String,
    pub edge_name: String,
    /// `vdc` or `vdc-group`.
    #[serde(default)]
    pub owner_type: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tier0_vrf_id: String,
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
}

fn default_rate_limit() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEdgeBody {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tier0_vrf_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEdgeBody {
    pub rate_limit: u32,
}

/// A network segment routed by an edge gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeNetworkRecord {
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub network_name: String,
    #[serde(default)]
    pub network_cidr: Option<String>,
    #[serde(default)]
    pub network_type: Option<String>,
}

// ── Network service tree ────────────────────────────────────────────

/// Node of the `GET /network` tree:
/// `tier-0-vrf → edge-gateway → {load-balancer | service}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkServiceNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub properties: NodeProperties,
    #[serde(default)]
    pub children: Vec<NetworkServiceNode>,
}

/// Union of the properties carried by the different node types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperties {
    #[serde(default, rename = "edgeUUID")]
    pub edge_uuid: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub announced: Option<bool>,
    #[serde(default)]
    pub ranges: Vec<String>,
    #[serde(default)]
    pub class_of_service: Option<String>,
    #[serde(default)]
    pub max_virtual_services: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceBody {
    pub network_type: String,
    pub edge_gateway: String,
    pub properties: CreateServiceProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceProperties {
    pub prefix_length: u8,
}

// ── Tier-0 VRFs ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier0Record {
    pub name: String,
    #[serde(default)]
    pub tier0_provider: Option<String>,
    #[serde(default)]
    pub class_service: String,
    #[serde(default)]
    pub services: Vec<Tier0ServiceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier0ServiceRecord {
    pub service: String,
    #[serde(default)]
    pub vlan_id: Option<serde_json::Value>,
}

// ── Public IPs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpsResponse {
    #[serde(default)]
    pub internal_ip: Option<String>,
    #[serde(default)]
    pub network_config: Vec<PublicIpRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpRecord {
    pub uplink_ip: String,
    #[serde(default)]
    pub translated_ip: Option<String>,
    #[serde(default)]
    pub edge_gateway_name: String,
}
