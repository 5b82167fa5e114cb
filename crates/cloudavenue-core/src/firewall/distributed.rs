// ── VDC group distributed firewall ──
//
// Lifecycle: absent → present(disabled) ↔ present(enabled). "Present" means
// DFW is activated on the VDC group; enabled/disabled is the state of its
// default policy. Rules always live in the default policy.

use cloudavenue_api::openapi::models::{DfwPoliciesRecord, EntityRef, FirewallRuleRecord};
use serde::Serialize;
use strum::Display;
use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::firewall::app_port_profiles::AppPortProfiles;
use crate::firewall::groups::FirewallGroups;
use crate::firewall::{self, FirewallRule, RuleStore};
use crate::urn::{self, UrnKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DfwState {
    Absent,
    Disabled,
    Enabled,
}

/// Distributed firewall of one VDC group.
pub struct DistributedFirewall {
    client: Client,
    vdc_group: EntityRef,
}

impl Client {
    /// Distributed firewall of a VDC group given by URN or name.
    pub async fn distributed_firewall(
        &self,
        vdc_group: &str,
    ) -> Result<DistributedFirewall, CoreError> {
        let record = if urn::is_kind(vdc_group, UrnKind::VdcGroup) {
            self.api().get_vdc_group(vdc_group).await
        } else {
            self.api().get_vdc_group_by_name(vdc_group).await
        }
        .map_err(|e| {
            if e.is_not_found() {
                CoreError::not_found("vdc group", vdc_group)
            } else {
                CoreError::from(e)
            }
        })?;
        Ok(DistributedFirewall {
            client: self.clone(),
            vdc_group: EntityRef {
                id: record.id,
                name: record.name,
            },
        })
    }
}

impl DistributedFirewall {
    pub fn vdc_group(&self) -> &EntityRef {
        &self.vdc_group
    }

    pub async fn state(&self) -> Result<DfwState, CoreError> {
        let api = self.client.api();
        let policies = api
            .get_dfw_policies(&self.vdc_group.id)
            .await
            .on("get dfw policies")?;
        if !policies.enabled {
            return Ok(DfwState::Absent);
        }
        let enabled = match policies.default_policy {
            Some(policy) => policy.enabled,
            None => {
                api.get_dfw_default_policy(&self.vdc_group.id)
                    .await
                    .on("get dfw default policy")?
                    .enabled
            }
        };
        Ok(if enabled {
            DfwState::Enabled
        } else {
            DfwState::Disabled
        })
    }

    /// Activate DFW on the VDC group, set its default policy and install
    /// `rules`.
    pub async fn create_firewall(
        &self,
        rules: Vec<FirewallRule>,
        enabled: bool,
    ) -> Result<(), CoreError> {
        rules.iter().try_for_each(firewall::rules::validate)?;
        if self.state().await? != DfwState::Absent {
            return Err(CoreError::Rejected {
                message: format!(
                    "distributed firewall already present on {}",
                    self.vdc_group.name
                ),
            });
        }

        self.set_activation(true).await?;
        self.write_default_policy(enabled).await?;
        if !rules.is_empty() {
            firewall::create_rules(self, rules).await?;
        }
        info!(vdc_group = %self.vdc_group.name, enabled, "distributed firewall created");
        Ok(())
    }

    /// Remove user rules, disable the default policy and deactivate DFW.
    pub async fn delete(&self) -> Result<(), CoreError> {
        self.require_present().await?;
        self.replace(Vec::new()).await?;
        self.write_default_policy(false).await?;
        self.set_activation(false).await?;
        info!(vdc_group = %self.vdc_group.name, "distributed firewall deleted");
        Ok(())
    }

    /// Toggle the default policy.
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), CoreError> {
        self.require_present().await?;
        self.write_default_policy(enabled).await?;
        info!(vdc_group = %self.vdc_group.name, enabled, "distributed firewall toggled");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<FirewallRule>, CoreError> {
        firewall::list_rules(self).await
    }

    pub async fn create(&self, rules: Vec<FirewallRule>) -> Result<(), CoreError> {
        firewall::create_rules(self, rules).await
    }

    pub async fn update(&self, rules: Vec<FirewallRule>) -> Result<(), CoreError> {
        firewall::update_rules(self, rules).await
    }

    pub async fn delete_all(&self) -> Result<(), CoreError> {
        self.replace(Vec::new()).await
    }

    /// Firewall groups owned by this VDC group.
    pub fn firewall_groups(&self) -> FirewallGroups {
        FirewallGroups::new(self.client.clone(), self.vdc_group.clone())
    }

    pub fn app_port_profiles(&self) -> AppPortProfiles {
        AppPortProfiles::new(self.client.clone(), self.vdc_group.id.clone())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn require_present(&self) -> Result<(), CoreError> {
        if self.state().await? == DfwState::Absent {
            return Err(CoreError::Rejected {
                message: format!("no distributed firewall on {}", self.vdc_group.name),
            });
        }
        Ok(())
    }

    async fn set_activation(&self, enabled: bool) -> Result<(), CoreError> {
        let task = self
            .client
            .api()
            .put_dfw_policies(
                &self.vdc_group.id,
                &DfwPoliciesRecord {
                    enabled,
                    default_policy: None,
                },
            )
            .await
            .on("update dfw policies")?;
        self.client.wait_task(task).await?;
        Ok(())
    }

    async fn write_default_policy(&self, enabled: bool) -> Result<(), CoreError> {
        let api = self.client.api();
        let mut policy = api
            .get_dfw_default_policy(&self.vdc_group.id)
            .await
            .on("get dfw default policy")?;
        policy.enabled = enabled;
        let task = api
            .put_dfw_default_policy(&self.vdc_group.id, &policy)
            .await
            .on("update dfw default policy")?;
        self.client.wait_task(task).await?;
        Ok(())
    }
}

impl RuleStore for DistributedFirewall {
    async fn fetch(&self) -> Result<Vec<FirewallRuleRecord>, CoreError> {
        Ok(self
            .client
            .api()
            .get_dfw_rules(&self.vdc_group.id)
            .await
            .on("get dfw rules")?
            .values)
    }

    async fn replace(&self, rules: Vec<FirewallRuleRecord>) -> Result<(), CoreError> {
        let task = self
            .client
            .api()
            .put_dfw_rules(&self.vdc_group.id, rules)
            .await
            .on("update dfw rules")?;
        self.client.wait_task(task).await?;
        Ok(())
    }
}
