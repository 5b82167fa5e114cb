// ── Tier-0 VRFs ──

use cloudavenue_api::infra::models::Tier0Record;
use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::edge::bandwidth::{Tier0Capacity, Tier0Class};
use crate::error::{ApiResultExt, CoreError};

/// A provider-managed Tier-0 VRF edges uplink to.
#[derive(Debug, Clone, Serialize)]
pub struct Tier0 {
    pub name: String,
    pub provider: Option<String>,
    pub class: Tier0Class,
    pub services: Vec<Tier0Service>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tier0Service {
    pub service: String,
    pub vlan_id: Option<String>,
}

impl TryFrom<Tier0Record> for Tier0 {
    type Error = CoreError;

    fn try_from(record: Tier0Record) -> Result<Self, Self::Error> {
        Ok(Self {
            class: record.class_service.parse()?,
            name: record.name,
            provider: record.tier0_provider,
            services: record
                .services
                .into_iter()
                .map(|s| Tier0Service {
                    service: s.service,
                    vlan_id: s.vlan_id.map(|v| match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    }),
                })
                .collect(),
        })
    }
}

/// Read access to the Tier-0 VRFs of the organization.
pub struct Tier0s {
    client: Client,
}

impl Client {
    pub fn tier0s(&self) -> Tier0s {
        Tier0s {
            client: self.clone(),
        }
    }
}

impl Tier0s {
    pub async fn list_names(&self) -> Result<Vec<String>, CoreError> {
        self.client.api().list_tier0_vrfs().await.on("list tier-0 vrfs")
    }

    pub async fn list(&self) -> Result<Vec<Tier0>, CoreError> {
        let mut tier0s = Vec::new();
        for name in self.list_names().await? {
            tier0s.push(self.get(&name).await?);
        }
        Ok(tier0s)
    }

    pub async fn get(&self, name: &str) -> Result<Tier0, CoreError> {
        if name.is_empty() {
            return Err(CoreError::empty("tier-0 name"));
        }
        let record = self.client.api().get_tier0_vrf(name).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::not_found("tier-0 vrf", name)
            } else {
                CoreError::from(e)
            }
        })?;
        Tier0::try_from(record)
    }

    /// Budget of `name`: its class capacity against the bandwidth of every
    /// edge uplinked to it.
    pub async fn capacity(&self, name: &str) -> Result<Tier0Capacity, CoreError> {
        let tier0 = self.get(name).await?;
        let edges = self.client.api().list_edges().await.on("list edges")?;
        let used: Vec<u32> = edges
            .iter()
            .filter(|edge| edge.tier0_vrf_id == name)
            .map(|edge| edge.rate_limit)
            .collect();
        debug!(tier0 = name, edges = used.len(), "computed tier-0 allocation");
        Ok(Tier0Capacity::new(name, tier0.class, &used))
    }

    /// Headroom of `name`, failing with `CapacityExhausted` when < 5 Mbps.
    pub async fn remaining_capacity(&self, name: &str) -> Result<u32, CoreError> {
        self.capacity(name).await?.remaining()
    }
}
