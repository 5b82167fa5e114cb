// ── Edge gateway domain types ──
//
// An edge gateway exists twice upstream: as a vCD OpenAPI entity (identity,
// owner, uplinks) and as an InfraAPI entity (Tier-0 and rate limit). The
// registry fetches both and folds them into one `EdgeGateway`.

pub mod bandwidth;
pub mod public_ip;
pub mod registry;
pub mod services;
pub mod tier0;

use std::fmt;

use cloudavenue_api::infra::models::EdgeRecord;
use cloudavenue_api::openapi::models::{EdgeGatewayRecord, EntityRef};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{info, warn};

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::firewall::app_port_profiles::AppPortProfiles;
use crate::firewall::edge::EdgeFirewall;
use crate::firewall::groups::FirewallGroups;
use crate::urn::{self, UrnKind};

pub use bandwidth::{DEFAULT_BANDWIDTH, Tier0Capacity, Tier0Class};
pub use public_ip::{PublicIp, PublicIps};
pub use registry::{EdgeCreateRequest, EdgeRegistry};
pub use services::{
    CATALOG, CloudAvenueServices, EdgeServices, LoadBalancerService, PublicIpService,
    ServiceCategory, ServiceEndpoint, ServiceProtocol,
};
pub use tier0::{Tier0, Tier0Service, Tier0s};

/// Attempts made by [`EdgeGateway::networks`] while the edge is still
/// propagating to the InfraAPI.
const NETWORKS_ATTEMPTS: u32 = 5;

/// Kind of object owning an edge gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OwnerKind {
    Vdc,
    VdcGroup,
}

impl OwnerKind {
    /// Owner kind implied by a URN, if it names a VDC or a VDC group.
    pub fn of_urn(id: &str) -> Option<Self> {
        match UrnKind::of(id)? {
            UrnKind::Vdc => Some(Self::Vdc),
            UrnKind::VdcGroup => Some(Self::VdcGroup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: String,
    pub name: String,
    pub kind: OwnerKind,
}

impl OwnerRef {
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// One edge gateway, reconciled from both upstream views and bound to the
/// client that fetched it.
#[derive(Clone, Serialize)]
pub struct EdgeGateway {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: OwnerRef,
    /// Name of the uplink Tier-0 VRF.
    pub tier0: String,
    /// Allocated bandwidth, in Mbps.
    pub bandwidth: u32,
    pub status: Option<String>,
    pub services: EdgeServices,

    #[serde(skip)]
    client: Client,
}

impl fmt::Debug for EdgeGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeGateway")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("tier0", &self.tier0)
            .field("bandwidth", &self.bandwidth)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

/// A network segment routed by an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeNetwork {
    pub id: Option<String>,
    pub name: String,
    pub cidr: Option<String>,
    pub network_type: Option<String>,
}

/// Identity, ownership, uplink and bandwidth of an edge, before services are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EdgeIdentity {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: OwnerRef,
    pub tier0: String,
    pub bandwidth: u32,
    pub status: Option<String>,
}

impl EdgeIdentity {
    /// Fold the OpenAPI entity and the InfraAPI entity of one edge.
    ///
    /// The owner kind comes from the owner URN. The Tier-0 comes from the
    /// InfraAPI record, falling back to the first OpenAPI uplink.
    pub(crate) fn reconcile(
        gateway: EdgeGatewayRecord,
        infra: &EdgeRecord,
    ) -> Result<Self, CoreError> {
        let owner_ref = gateway
            .owner_ref
            .or(gateway.org_vdc)
            .ok_or_else(|| CoreError::empty("edge gateway owner"))?;
        let kind = OwnerKind::of_urn(&owner_ref.id)
            .or_else(|| infra.owner_type.parse().ok())
            .ok_or_else(|| {
                CoreError::invalid(
                    "edge gateway owner",
                    format!("{} is neither a vdc nor a vdc group", owner_ref.id),
                )
            })?;

        let tier0 = if infra.tier0_vrf_id.is_empty() {
            gateway
                .edge_gateway_uplinks
                .first()
                .map(|uplink| uplink.uplink_name.clone())
                .unwrap_or_default()
        } else {
            infra.tier0_vrf_id.clone()
        };

        Ok(Self {
            id: gateway.id,
            name: gateway.name,
            description: gateway.description.filter(|d| !d.is_empty()),
            owner: OwnerRef {
                id: owner_ref.id,
                name: owner_ref.name,
                kind,
            },
            tier0,
            bandwidth: infra.rate_limit,
            status: gateway.status,
        })
    }
}

impl EdgeGateway {
    pub(crate) fn assemble(client: Client, identity: EdgeIdentity, services: EdgeServices) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            description: identity.description,
            owner: identity.owner,
            tier0: identity.tier0,
            bandwidth: identity.bandwidth,
            status: identity.status,
            services,
            client,
        }
    }

    /// Bare UUID of the edge, as used by the network service tree.
    pub fn uuid(&self) -> &str {
        urn::extract_uuid(&self.id)
    }

    /// Re-read the edge and its services from the server.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        *self = self.client.edges().get(&self.id).await?;
        Ok(())
    }

    /// Change the allocated bandwidth, checked against the Tier-0 budget.
    pub async fn update_bandwidth(&mut self, bandwidth: u32) -> Result<(), CoreError> {
        self.client.edges().update(&self.id, bandwidth).await?;
        self.bandwidth = bandwidth;
        Ok(())
    }

    pub async fn delete(self) -> Result<(), CoreError> {
        self.client.edges().delete(&self.id).await
    }

    // ── Network services ─────────────────────────────────────────────

    /// Attach the Cloud Avenue services zone to this edge.
    pub async fn enable_cloudavenue_services(&mut self) -> Result<(), CoreError> {
        if self.services.service.is_some() {
            return Err(CoreError::Rejected {
                message: format!("cloud avenue services already enabled on {}", self.name),
            });
        }
        let job = self
            .client
            .api()
            .create_network_service(
                services::SERVICE_CAV,
                self.uuid(),
                services::SERVICE_PREFIX_LENGTH,
            )
            .await
            .on("enable cloud avenue services")?;
        self.client.wait_job(&job).await?;
        self.reload_services().await?;
        info!(edge = %self.name, "cloud avenue services enabled");
        Ok(())
    }

    /// Detach the Cloud Avenue services zone from this edge.
    pub async fn disable_cloudavenue_services(&mut self) -> Result<(), CoreError> {
        let Some(service) = &self.services.service else {
            return Err(CoreError::Rejected {
                message: format!("cloud avenue services not enabled on {}", self.name),
            });
        };
        let job = self
            .client
            .api()
            .delete_network_service(&service.id)
            .await
            .on("disable cloud avenue services")?;
        self.client.wait_job(&job).await?;
        self.reload_services().await?;
        info!(edge = %self.name, "cloud avenue services disabled");
        Ok(())
    }

    async fn reload_services(&mut self) -> Result<(), CoreError> {
        let tree = self
            .client
            .api()
            .get_network_services()
            .await
            .on("get network services")?;
        self.services = services::reconcile(&tree, &self.tier0, self.uuid());
        Ok(())
    }

    // ── Related objects ──────────────────────────────────────────────

    /// Networks routed by this edge.
    ///
    /// A freshly created edge takes a moment to appear on the InfraAPI; a
    /// 404 is retried a few times before giving up.
    pub async fn networks(&self) -> Result<Vec<EdgeNetwork>, CoreError> {
        let mut attempt = 1;
        let records = loop {
            match self.client.api().list_edge_networks(&self.id).await {
                Ok(records) => break records,
                Err(e) if e.is_not_found() && attempt < NETWORKS_ATTEMPTS => {
                    warn!(edge = %self.name, attempt, "edge networks not found yet, retrying");
                    attempt += 1;
                    tokio::select! {
                        biased;
                        () = self.client.cancellation().cancelled() => return Err(CoreError::Cancelled),
                        () = tokio::time::sleep(self.client.config().poll_interval) => {}
                    }
                }
                Err(e) if e.is_not_found() => {
                    return Err(CoreError::not_found("edge networks", &self.name));
                }
                Err(e) => return Err(e).on("list edge networks"),
            }
        };
        Ok(records
            .into_iter()
            .map(|r| EdgeNetwork {
                id: r.network_id,
                name: r.network_name,
                cidr: r.network_cidr,
                network_type: r.network_type,
            })
            .collect())
    }

    /// Public IPs of the organization NATed on this edge.
    pub async fn public_ips(&self) -> Result<Vec<PublicIp>, CoreError> {
        let all = self.client.public_ips().list().await?;
        Ok(all
            .into_iter()
            .filter(|ip| ip.edge_gateway_name == self.name)
            .collect())
    }

    /// The uplink Tier-0 VRF.
    pub async fn tier0(&self) -> Result<Tier0, CoreError> {
        self.client.tier0s().get(&self.tier0).await
    }

    pub fn firewall(&self) -> EdgeFirewall {
        EdgeFirewall::new(self.client.clone(), self.id.clone())
    }

    /// Firewall groups (security groups, IP sets, dynamic groups) owned by
    /// this edge.
    pub fn firewall_groups(&self) -> FirewallGroups {
        FirewallGroups::new(
            self.client.clone(),
            EntityRef {
                id: self.id.clone(),
                name: self.name.clone(),
            },
        )
    }

    /// Application port profiles visible from this edge's owner.
    pub fn app_port_profiles(&self) -> AppPortProfiles {
        AppPortProfiles::new(self.client.clone(), self.owner.id.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn gateway(owner: &str) -> EdgeGatewayRecord {
        serde_json::from_value(json!({
            "id": "urn:vcloud:gateway:7e5b4f2c-1a3d-4e6f-8a9b-0c1d2e3f4a5b",
            "name": "tn01e02ocb0001234spt101",
            "description": "",
            "ownerRef": { "id": owner, "name": "my-vdc" },
            "edgeGatewayUplinks": [{ "uplinkId": "u1", "uplinkName": "prvrf01eocb0001234allsp01" }]
        }))
        .unwrap()
    }

    fn infra(tier0: &str, rate: u32) -> EdgeRecord {
        serde_json::from_value(json!({
            "edgeId": "urn:vcloud:gateway:7e5b4f2c-1a3d-4e6f-8a9b-0c1d2e3f4a5b",
            "edgeName": "tn01e02ocb0001234spt101",
            "ownerType": "vdc",
            "tier0VrfId": tier0,
            "rateLimit": rate
        }))
        .unwrap()
    }

    #[test]
    fn owner_kind_follows_owner_urn() {
        let vdc = EdgeIdentity::reconcile(
            gateway("urn:vcloud:vdc:1b2c3d4e-5f60-4718-9a0b-1c2d3e4f5a6b"),
            &infra("t0", 25),
        )
        .unwrap();
        assert_eq!(vdc.owner.kind, OwnerKind::Vdc);
        assert_eq!(vdc.bandwidth, 25);
        assert_eq!(vdc.description, None);

        let group = EdgeIdentity::reconcile(
            gateway("urn:vcloud:vdcGroup:1b2c3d4e-5f60-4718-9a0b-1c2d3e4f5a6b"),
            &infra("t0", 5),
        )
        .unwrap();
        assert_eq!(group.owner.kind, OwnerKind::VdcGroup);
    }

    #[test]
    fn tier0_falls_back_to_first_uplink() {
        let identity = EdgeIdentity::reconcile(
            gateway("urn:vcloud:vdc:1b2c3d4e-5f60-4718-9a0b-1c2d3e4f5a6b"),
            &infra("", 5),
        )
        .unwrap();
        assert_eq!(identity.tier0, "prvrf01eocb0001234allsp01");
    }

    #[test]
    fn owner_kind_strings() {
        assert_eq!(OwnerKind::VdcGroup.to_string(), "vdc-group");
        assert_eq!("vdc".parse::<OwnerKind>().unwrap(), OwnerKind::Vdc);
    }
}
