// ── Firewall groups ──
//
// Security groups, IP sets and dynamic security groups are three flavors of
// one OpenAPI entity, told apart by `typeValue`. Each flavor implements
// `FirewallGroup`; `FirewallGroups` provides the CRUD for all of them,
// scoped to one owner (an edge gateway or a VDC group).

use cloudavenue_api::openapi::models::{
    EntityRef, FirewallGroupRecord, VmCriteriaRecord, VmCriteriaRuleRecord,
};
use cloudavenue_api::openapi::{fiql_and, fiql_eq};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::urn::{self, UrnKind};
use crate::validate;

pub const MAX_CRITERIA: usize = 3;
pub const MAX_CRITERIA_RULES: usize = 4;

/// One flavor of firewall group.
pub trait FirewallGroup: Sized {
    /// Upstream `typeValue`.
    const TYPE_VALUE: &'static str;

    fn id(&self) -> Option<&str>;
    fn name(&self) -> &str;
    fn validate(&self) -> Result<(), CoreError>;
    fn to_record(&self, owner: &EntityRef) -> FirewallGroupRecord;
    fn from_record(record: FirewallGroupRecord) -> Result<Self, CoreError>;
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::empty("firewall group name"));
    }
    Ok(())
}

// ── Security group ───────────────────────────────────────────────────

/// Static group of networks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// Network URNs.
    #[serde(default)]
    pub members: Vec<String>,
}

impl FirewallGroup for SecurityGroup {
    const TYPE_VALUE: &'static str = "SECURITY_GROUP";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        if let Some(bad) = self
            .members
            .iter()
            .find(|m| !urn::is_kind(m, UrnKind::Network))
        {
            return Err(CoreError::invalid(
                "security group member",
                format!("{bad} is not a network urn"),
            ));
        }
        Ok(())
    }

    fn to_record(&self, owner: &EntityRef) -> FirewallGroupRecord {
        FirewallGroupRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            type_value: Self::TYPE_VALUE.to_owned(),
            owner_ref: Some(owner.clone()),
            members: self.members.iter().map(EntityRef::from_id).collect(),
            ..FirewallGroupRecord::default()
        }
    }

    fn from_record(record: FirewallGroupRecord) -> Result<Self, CoreError> {
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            members: record.members.into_iter().map(|m| m.id).collect(),
        })
    }
}

// ── IP set ───────────────────────────────────────────────────────────

/// Static set of addresses: IPv4, IPv6, CIDR or IPv4 range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpSet {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub ip_addresses: Vec<String>,
}

impl FirewallGroup for IpSet {
    const TYPE_VALUE: &'static str = "IP_SET";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        for ip in &self.ip_addresses {
            let ok = validate::is_ipv4(ip)
                || validate::is_ipv6(ip)
                || validate::is_cidr(ip)
                || validate::is_ipv4_range(ip);
            if !ok {
                return Err(CoreError::invalid(
                    "ip set address",
                    format!("{ip} is not an IP address, CIDR or IPv4 range"),
                ));
            }
        }
        Ok(())
    }

    fn to_record(&self, owner: &EntityRef) -> FirewallGroupRecord {
        FirewallGroupRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            type_value: Self::TYPE_VALUE.to_owned(),
            owner_ref: Some(owner.clone()),
            ip_addresses: self.ip_addresses.clone(),
            ..FirewallGroupRecord::default()
        }
    }

    fn from_record(record: FirewallGroupRecord) -> Result<Self, CoreError> {
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            ip_addresses: record.ip_addresses,
        })
    }
}

// ── Dynamic security group ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriteriaAttribute {
    VmName,
    VmTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriteriaOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl CriteriaAttribute {
    pub fn supports(self, operator: CriteriaOperator) -> bool {
        match self {
            Self::VmName => true,
            Self::VmTag => !matches!(
                operator,
                CriteriaOperator::Equals | CriteriaOperator::EndsWith
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaRule {
    pub attribute: CriteriaAttribute,
    pub operator: CriteriaOperator,
    pub value: String,
}

/// Rules of one criterion are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmCriteria {
    pub rules: Vec<CriteriaRule>,
}

/// Group whose VM membership is computed from criteria. Criteria are ORed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicSecurityGroup {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub criteria: Vec<VmCriteria>,
}

impl FirewallGroup for DynamicSecurityGroup {
    const TYPE_VALUE: &'static str = "VM_CRITERIA";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        if self.criteria.len() > MAX_CRITERIA {
            return Err(CoreError::invalid(
                "dynamic security group criteria",
                format!("at most {MAX_CRITERIA} criteria, got {}", self.criteria.len()),
            ));
        }
        for criteria in &self.criteria {
            if criteria.rules.is_empty() || criteria.rules.len() > MAX_CRITERIA_RULES {
                return Err(CoreError::invalid(
                    "dynamic security group criteria",
                    format!(
                        "each criterion needs 1 to {MAX_CRITERIA_RULES} rules, got {}",
                        criteria.rules.len()
                    ),
                ));
            }
            for rule in &criteria.rules {
                if rule.value.is_empty() {
                    return Err(CoreError::empty("criteria value"));
                }
                if !rule.attribute.supports(rule.operator) {
                    return Err(CoreError::invalid(
                        "criteria operator",
                        format!("{} is not supported for {}", rule.operator, rule.attribute),
                    ));
                }
            }
        }
        Ok(())
    }

    fn to_record(&self, owner: &EntityRef) -> FirewallGroupRecord {
        FirewallGroupRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            type_value: Self::TYPE_VALUE.to_owned(),
            owner_ref: Some(owner.clone()),
            vm_criteria: self
                .criteria
                .iter()
                .map(|c| VmCriteriaRecord {
                    vm_criteria_rule: c
                        .rules
                        .iter()
                        .map(|r| VmCriteriaRuleRecord {
                            attribute_type: r.attribute.to_string(),
                            attribute_value: r.value.clone(),
                            operator: r.operator.to_string(),
                        })
                        .collect(),
                })
                .collect(),
            ..FirewallGroupRecord::default()
        }
    }

    fn from_record(record: FirewallGroupRecord) -> Result<Self, CoreError> {
        let criteria = record
            .vm_criteria
            .into_iter()
            .map(|c| {
                let rules = c
                    .vm_criteria_rule
                    .into_iter()
                    .map(|r| {
                        Ok(CriteriaRule {
                            attribute: r.attribute_type.parse().map_err(|_| {
                                CoreError::invalid("criteria attribute", r.attribute_type.clone())
                            })?,
                            operator: r.operator.parse().map_err(|_| {
                                CoreError::invalid("criteria operator", r.operator.clone())
                            })?,
                            value: r.attribute_value,
                        })
                    })
                    .collect::<Result<Vec<_>, CoreError>>()?;
                Ok(VmCriteria { rules })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            criteria,
        })
    }
}

// ── CRUD ─────────────────────────────────────────────────────────────

/// Firewall groups of one owner.
pub struct FirewallGroups {
    client: Client,
    owner: EntityRef,
}

impl FirewallGroups {
    pub fn new(client: Client, owner: EntityRef) -> Self {
        Self { client, owner }
    }

    pub fn owner(&self) -> &EntityRef {
        &self.owner
    }

    fn filter<G: FirewallGroup>(&self, name: Option<&str>) -> String {
        let mut clauses = vec![
            fiql_eq("ownerRef.id", &self.owner.id),
            fiql_eq("typeValue", G::TYPE_VALUE),
        ];
        if let Some(name) = name {
            clauses.push(fiql_eq("name", name));
        }
        fiql_and(&clauses)
    }

    /// Every group of flavor `G` owned by this owner, with full content.
    pub async fn list<G: FirewallGroup>(&self) -> Result<Vec<G>, CoreError> {
        let api = self.client.api();
        let summaries = api
            .list_firewall_groups(&self.filter::<G>(None))
            .await
            .on("list firewall groups")?;
        try_join_all(summaries.into_iter().filter_map(|s| s.id).map(|id| async move {
            let record = api.get_firewall_group(&id).await.on("get firewall group")?;
            G::from_record(record)
        }))
        .await
    }

    /// One group of flavor `G` by URN or by name.
    pub async fn get<G: FirewallGroup>(&self, name_or_urn: &str) -> Result<G, CoreError> {
        let id = self.resolve::<G>(name_or_urn).await?;
        let record = self
            .client
            .api()
            .get_firewall_group(&id)
            .await
            .map_err(|e| lookup_error(e, name_or_urn))?;
        if record.type_value != G::TYPE_VALUE {
            return Err(CoreError::not_found(G::TYPE_VALUE, name_or_urn));
        }
        G::from_record(record)
    }

    /// Create `group` under this owner and return it as stored.
    pub async fn create<G: FirewallGroup>(&self, group: &G) -> Result<G, CoreError> {
        group.validate()?;
        let mut record = group.to_record(&self.owner);
        record.id = None;
        let task = self
            .client
            .api()
            .create_firewall_group(&record)
            .await
            .on("create firewall group")?;
        self.client.wait_task(task).await?;
        info!(owner = %self.owner.name, kind = G::TYPE_VALUE, name = group.name(), "firewall group created");
        self.get(group.name()).await
    }

    /// Replace the content of an existing group, found by id or name.
    pub async fn update<G: FirewallGroup>(&self, group: &G) -> Result<(), CoreError> {
        group.validate()?;
        let id = match group.id() {
            Some(id) => id.to_owned(),
            None => self.resolve::<G>(group.name()).await?,
        };
        let mut record = group.to_record(&self.owner);
        record.id = Some(id.clone());
        let task = self
            .client
            .api()
            .update_firewall_group(&id, &record)
            .await
            .on("update firewall group")?;
        self.client.wait_task(task).await?;
        info!(owner = %self.owner.name, kind = G::TYPE_VALUE, name = group.name(), "firewall group updated");
        Ok(())
    }

    pub async fn delete<G: FirewallGroup>(&self, name_or_urn: &str) -> Result<(), CoreError> {
        let id = self.resolve::<G>(name_or_urn).await?;
        let task = self
            .client
            .api()
            .delete_firewall_group(&id)
            .await
            .on("delete firewall group")?;
        self.client.wait_task(task).await?;
        info!(owner = %self.owner.name, kind = G::TYPE_VALUE, id = %id, "firewall group deleted");
        Ok(())
    }

    async fn resolve<G: FirewallGroup>(&self, name_or_urn: &str) -> Result<String, CoreError> {
        if name_or_urn.is_empty() {
            return Err(CoreError::empty("firewall group name or id"));
        }
        if urn::is_kind(name_or_urn, UrnKind::SecurityGroup) {
            return Ok(name_or_urn.to_owned());
        }
        let mut matches: Vec<String> = self
            .client
            .api()
            .list_firewall_groups(&self.filter::<G>(Some(name_or_urn)))
            .await
            .on("list firewall groups")?
            .into_iter()
            .filter(|g| g.name == name_or_urn)
            .filter_map(|g| g.id)
            .collect();
        match matches.len() {
            0 => Err(CoreError::not_found(G::TYPE_VALUE, name_or_urn)),
            1 => Ok(matches.remove(0)),
            count => Err(CoreError::Ambiguous {
                entity: G::TYPE_VALUE.to_owned(),
                name: name_or_urn.to_owned(),
                count,
            }),
        }
    }
}

fn lookup_error(err: cloudavenue_api::Error, identifier: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::not_found("firewall group", identifier)
    } else {
        CoreError::from(err)
    }
}
