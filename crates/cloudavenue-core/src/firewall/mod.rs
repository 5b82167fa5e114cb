// ── Firewall domain types ──
//
// Rules are shared by the edge gateway firewall and the VDC group
// distributed firewall; both store them as one user-defined bucket that is
// replaced as a whole on every change.

pub mod app_port_profiles;
pub mod distributed;
pub mod edge;
pub mod groups;
pub mod rules;

use cloudavenue_api::openapi::models::FirewallRuleRecord;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::CoreError;

pub use app_port_profiles::{AppPortProfile, AppPortProfiles, PortProtocol, PortRule, ProfileScope};
pub use distributed::{DfwState, DistributedFirewall};
pub use edge::EdgeFirewall;
pub use groups::{
    CriteriaAttribute, CriteriaOperator, CriteriaRule, DynamicSecurityGroup, FirewallGroup,
    FirewallGroups, IpSet, SecurityGroup, VmCriteria,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    Allow,
    Drop,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleDirection {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IpProtocol {
    Ipv4,
    Ipv6,
    #[default]
    Ipv4Ipv6,
}

/// One firewall rule. `priority` 1 is evaluated first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FirewallRule {
    pub id: Option<String>,
    pub name: String,
    pub comment: Option<String>,
    pub priority: u16,
    pub action: RuleAction,
    pub enabled: bool,
    pub direction: RuleDirection,
    pub ip_protocol: IpProtocol,
    pub logging: bool,
    /// IPv4 addresses, CIDRs or IPv4 ranges.
    #[serde(default)]
    pub source_ips: Vec<String>,
    #[serde(default)]
    pub destination_ips: Vec<String>,
    /// Firewall group URNs.
    #[serde(default)]
    pub source_groups: Vec<String>,
    #[serde(default)]
    pub destination_groups: Vec<String>,
    #[serde(default)]
    pub app_port_profiles: Vec<String>,
    #[serde(default)]
    pub network_context_profiles: Vec<String>,
}

impl FirewallRule {
    /// An enabled rule for both IP families with no match criteria.
    pub fn new(
        name: impl Into<String>,
        priority: u16,
        action: RuleAction,
        direction: RuleDirection,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            comment: None,
            priority,
            action,
            enabled: true,
            direction,
            ip_protocol: IpProtocol::default(),
            logging: false,
            source_ips: Vec::new(),
            destination_ips: Vec::new(),
            source_groups: Vec::new(),
            destination_groups: Vec::new(),
            app_port_profiles: Vec::new(),
            network_context_profiles: Vec::new(),
        }
    }

    /// Content identity: equal for rules sharing name, action and direction.
    pub fn hash(&self) -> String {
        rules::rule_hash(&self.name, self.action, self.direction)
    }
}

// ── Shared bucket operations ─────────────────────────────────────────

/// Storage of one user-defined rule bucket.
pub(crate) trait RuleStore {
    async fn fetch(&self) -> Result<Vec<FirewallRuleRecord>, CoreError>;
    async fn replace(&self, rules: Vec<FirewallRuleRecord>) -> Result<(), CoreError>;
}

pub(crate) async fn list_rules<S: RuleStore>(store: &S) -> Result<Vec<FirewallRule>, CoreError> {
    let mut rules = store
        .fetch()
        .await?
        .into_iter()
        .map(rules::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    rules::sort_rules(&mut rules);
    Ok(rules)
}

pub(crate) async fn create_rules<S: RuleStore>(
    store: &S,
    new: Vec<FirewallRule>,
) -> Result<(), CoreError> {
    new.iter().try_for_each(rules::validate)?;
    let existing = list_rules(store).await?;
    let merged = rules::merge_create(existing, new);
    debug!(count = merged.len(), "writing firewall rule bucket");
    store
        .replace(merged.iter().map(rules::to_record).collect())
        .await
}

pub(crate) async fn update_rules<S: RuleStore>(
    store: &S,
    updates: Vec<FirewallRule>,
) -> Result<(), CoreError> {
    updates.iter().try_for_each(rules::validate)?;
    let existing = list_rules(store).await?;
    let merged = rules::merge_update(existing, updates);
    debug!(count = merged.len(), "writing firewall rule bucket");
    store
        .replace(merged.iter().map(rules::to_record).collect())
        .await
}
