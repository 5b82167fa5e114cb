// ── Application port profiles ──
//
// Named protocol/port sets referenced by firewall rules. Profiles exist in
// three scopes; tenants read all of them and write only their own.

use cloudavenue_api::openapi::models::{AppPortProfileRecord, ApplicationPortRecord};
use cloudavenue_api::openapi::{fiql_and, fiql_eq};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, info};

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::urn::{self, UrnKind};
use crate::validate;

/// Search order of a lookup by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileScope {
    Tenant,
    Provider,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum PortProtocol {
    #[strum(serialize = "ICMPv4")]
    #[serde(rename = "ICMPv4")]
    Icmpv4,
    #[strum(serialize = "ICMPv6")]
    #[serde(rename = "ICMPv6")]
    Icmpv6,
    #[strum(serialize = "TCP")]
    #[serde(rename = "TCP")]
    Tcp,
    #[strum(serialize = "UDP")]
    #[serde(rename = "UDP")]
    Udp,
}

impl PortProtocol {
    pub fn takes_ports(self) -> bool {
        matches!(self, Self::Tcp | Self::Udp)
    }
}

/// A protocol with its destination ports (`"443"`, `"8000-8080"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRule {
    pub protocol: PortProtocol,
    #[serde(default)]
    pub ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPortProfile {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub scope: ProfileScope,
    pub ports: Vec<PortRule>,
}

impl AppPortProfile {
    /// A tenant profile, the only scope a tenant may create.
    pub fn tenant(name: impl Into<String>, ports: Vec<PortRule>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            scope: ProfileScope::Tenant,
            ports,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::empty("application port profile name"));
        }
        if self.ports.is_empty() {
            return Err(CoreError::empty("application port profile ports"));
        }
        for rule in &self.ports {
            if rule.protocol.takes_ports() {
                if rule.ports.is_empty() {
                    return Err(CoreError::invalid(
                        "application port",
                        format!("{} needs at least one port", rule.protocol),
                    ));
                }
                if let Some(bad) = rule.ports.iter().find(|p| !validate::is_port_literal(p)) {
                    return Err(CoreError::invalid(
                        "application port",
                        format!("{bad} is not a port or port range"),
                    ));
                }
            } else if !rule.ports.is_empty() {
                return Err(CoreError::invalid(
                    "application port",
                    format!("{} does not take ports", rule.protocol),
                ));
            }
        }
        Ok(())
    }

    fn to_record(&self, context_id: &str) -> AppPortProfileRecord {
        AppPortProfileRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            scope: self.scope.to_string(),
            org_ref: None,
            context_entity_id: Some(context_id.to_owned()),
            application_ports: self
                .ports
                .iter()
                .map(|r| ApplicationPortRecord {
                    protocol: r.protocol.to_string(),
                    destination_ports: r.ports.clone(),
                })
                .collect(),
        }
    }

    fn from_record(record: AppPortProfileRecord) -> Result<Self, CoreError> {
        let scope = record
            .scope
            .parse()
            .map_err(|_| CoreError::invalid("application port profile scope", record.scope.clone()))?;
        let ports = record
            .application_ports
            .into_iter()
            .map(|p| {
                let protocol = p
                    .protocol
                    .parse()
                    .map_err(|_| CoreError::invalid("application port protocol", p.protocol.clone()))?;
                Ok(PortRule {
                    protocol,
                    ports: p.destination_ports,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            scope,
            ports,
        })
    }
}

/// Application port profiles visible from one VDC or VDC group.
pub struct AppPortProfiles {
    client: Client,
    context_id: String,
}

impl AppPortProfiles {
    pub fn new(client: Client, context_id: impl Into<String>) -> Self {
        Self {
            client,
            context_id: context_id.into(),
        }
    }

    pub async fn list(&self) -> Result<Vec<AppPortProfile>, CoreError> {
        self.client
            .api()
            .list_app_port_profiles(&fiql_eq("_context", &self.context_id))
            .await
            .on("list application port profiles")?
            .into_iter()
            .map(AppPortProfile::from_record)
            .collect()
    }

    /// A profile by URN, or by name searching TENANT, PROVIDER, then SYSTEM.
    pub async fn get(&self, name_or_urn: &str) -> Result<AppPortProfile, CoreError> {
        if name_or_urn.is_empty() {
            return Err(CoreError::empty("application port profile name or id"));
        }
        if urn::is_kind(name_or_urn, UrnKind::AppPortProfile) {
            let record = self
                .client
                .api()
                .get_app_port_profile(name_or_urn)
                .await
                .map_err(|e| {
                    if e.is_not_found() {
                        CoreError::not_found("application port profile", name_or_urn)
                    } else {
                        CoreError::from(e)
                    }
                })?;
            return AppPortProfile::from_record(record);
        }

        for scope in ProfileScope::iter() {
            let filter = fiql_and(&[
                fiql_eq("name", name_or_urn),
                fiql_eq("scope", &scope.to_string()),
                fiql_eq("_context", &self.context_id),
            ]);
            let mut found: Vec<AppPortProfileRecord> = self
                .client
                .api()
                .list_app_port_profiles(&filter)
                .await
                .on("list application port profiles")?
                .into_iter()
                .filter(|p| p.name == name_or_urn)
                .collect();
            debug!(name = name_or_urn, %scope, matches = found.len(), "application port profile lookup");
            match found.len() {
                0 => {}
                1 => return AppPortProfile::from_record(found.remove(0)),
                count => {
                    return Err(CoreError::Ambiguous {
                        entity: format!("{scope} application port profile"),
                        name: name_or_urn.to_owned(),
                        count,
                    });
                }
            }
        }
        Err(CoreError::not_found("application port profile", name_or_urn))
    }

    /// Create a TENANT profile and return it as stored.
    pub async fn create(&self, profile: &AppPortProfile) -> Result<AppPortProfile, CoreError> {
        if profile.scope != ProfileScope::Tenant {
            return Err(CoreError::invalid(
                "application port profile scope",
                format!("only TENANT profiles can be created, got {}", profile.scope),
            ));
        }
        profile.validate()?;
        let mut record = profile.to_record(&self.context_id);
        record.id = None;
        let task = self
            .client
            .api()
            .create_app_port_profile(&record)
            .await
            .on("create application port profile")?;
        self.client.wait_task(task).await?;
        info!(name = %profile.name, "application port profile created");
        self.get(&profile.name).await
    }

    pub async fn update(&self, profile: &AppPortProfile) -> Result<(), CoreError> {
        profile.validate()?;
        let current = match &profile.id {
            Some(id) => self.get(id).await?,
            None => self.get(&profile.name).await?,
        };
        let id = writable(&current)?;
        let mut record = profile.to_record(&self.context_id);
        record.id = Some(id.clone());
        record.scope = ProfileScope::Tenant.to_string();
        let task = self
            .client
            .api()
            .update_app_port_profile(&id, &record)
            .await
            .on("update application port profile")?;
        self.client.wait_task(task).await?;
        info!(name = %profile.name, "application port profile updated");
        Ok(())
    }

    pub async fn delete(&self, name_or_urn: &str) -> Result<(), CoreError> {
        let current = self.get(name_or_urn).await?;
        let id = writable(&current)?;
        let task = self
            .client
            .api()
            .delete_app_port_profile(&id)
            .await
            .on("delete application port profile")?;
        self.client.wait_task(task).await?;
        info!(name = %current.name, "application port profile deleted");
        Ok(())
    }
}

/// Id of a profile the tenant may modify.
fn writable(profile: &AppPortProfile) -> Result<String, CoreError> {
    if profile.scope != ProfileScope::Tenant {
        return Err(CoreError::Rejected {
            message: format!(
                "{} profile {} is read-only",
                profile.scope, profile.name
            ),
        });
    }
    profile
        .id
        .clone()
        .ok_or_else(|| CoreError::empty("application port profile id"))
}
