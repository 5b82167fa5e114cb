// vCloud Director OpenAPI wire types
//
// Only the fields the SDK reads or writes are modeled. Unknown fields are
// ignored on read; optional fields are skipped on write so a PUT never sends
// `null` for something the server owns.

use serde::{Deserialize, Serialize};

// ── Shared ──────────────────────────────────────────────────────────

/// `{id, name}` reference to another entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl EntityRef {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }
}

/// One page of an OpenAPI collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub result_total: u32,
    #[serde(default = "first_page")]
    pub page_count: u32,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

fn first_page() -> u32 {
    1
}

// ── Tasks ───────────────────────────────────────────────────────────

/// Reference to an asynchronous vCD task, taken from a `Location` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub id: String,
    pub href: String,
}

impl TaskRef {
    /// Build a reference from `https://host/api/task/<id>`.
    pub fn from_href(href: &str) -> Self {
        let id = href
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        Self {
            id,
            href: href.to_owned(),
        }
    }
}

/// Body of `GET /api/task/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// `queued`, `preRunning`, `running`, `success`, `error`, `aborted`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub error: Option<TaskError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub major_error_code: Option<i64>,
    #[serde(default)]
    pub minor_error_code: Option<String>,
}

// ── Edge gateways, VDCs, VDC groups ─────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGatewayRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_ref: Option<EntityRef>,
    #[serde(default)]
    pub org_vdc: Option<EntityRef>,
    #[serde(default)]
    pub edge_gateway_uplinks: Vec<EdgeGatewayUplink>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGatewayUplink {
    #[serde(default)]
    pub uplink_id: String,
    #[serde(default)]
    pub uplink_name: String,
    #[serde(default)]
    pub dedicated: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VdcRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub allocation_type: Option<String>,
    #[serde(default)]
    pub org: Option<EntityRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VdcGroupRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub dfw_enabled: bool,
}

// ── Firewall rules ──────────────────────────────────────────────────

/// Body of `GET/PUT /edgeGateways/{id}/firewall/rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRulesRecord {
    #[serde(default, skip_serializing)]
    pub system_rules: Vec<FirewallRuleRecord>,
    #[serde(default)]
    pub user_defined_rules: Vec<FirewallRuleRecord>,
    #[serde(default, skip_serializing)]
    pub default_rules: Vec<FirewallRuleRecord>,
}

/// One rule, shared by edge and distributed firewalls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    /// `ALLOW`, `DROP`, `REJECT`.
    pub action_value: String,
    /// `IN`, `OUT`, `IN_OUT`.
    pub direction: String,
    /// `IPV4`, `IPV6`, `IPV4_IPV6`.
    pub ip_protocol: String,
    #[serde(default)]
    pub logging: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_firewall_groups: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_firewall_groups: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub application_port_profiles: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_context_profiles: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_firewall_ip_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_firewall_ip_addresses: Vec<String>,
}

/// Body of `GET/PUT /vdcGroups/{id}/dfwPolicies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfwPoliciesRecord {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_policy: Option<DfwPolicyRecord>,
}

/// Body of `GET/PUT /vdcGroups/{id}/dfwPolicies/default`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfwPolicyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
}

/// Body of `GET/PUT /vdcGroups/{id}/dfwPolicies/default/rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DfwRulesRecord {
    #[serde(default)]
    pub values: Vec<FirewallRuleRecord>,
}

// ── Firewall groups ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallGroupRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `SECURITY_GROUP`, `IP_SET`, `VM_CRITERIA`.
    pub type_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ref: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vm_criteria: Vec<VmCriteriaRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmCriteriaRecord {
    #[serde(default)]
    pub vm_criteria_rule: Vec<VmCriteriaRuleRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmCriteriaRuleRecord {
    pub attribute_type: String,
    pub attribute_value: String,
    pub operator: String,
}

// ── Application port profiles ───────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPortProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `TENANT`, `PROVIDER`, `SYSTEM`.
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_ref: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_entity_id: Option<String>,
    #[serde(default)]
    pub application_ports: Vec<ApplicationPortRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPortRecord {
    /// `ICMPv4`, `ICMPv6`, `TCP`, `UDP`.
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_ports: Vec<String>,
}

// ── Certificate library ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub certificate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_passphrase: Option<String>,
}

// ── IAM ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub role_entity_refs: Vec<EntityRef>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub locked: bool,
    /// `INTEGRATED` or `SAML`.
    #[serde(default)]
    pub provider_type: String,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub deployed_vm_quota: u32,
    #[serde(default)]
    pub stored_vm_quota: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}
