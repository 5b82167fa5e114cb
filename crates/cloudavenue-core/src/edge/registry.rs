// ── Edge gateway registry ──
//
// Lifecycle of edge gateways: discovery, creation in a VDC or VDC group,
// bandwidth updates against the Tier-0 budget, deletion. Every read goes to
// the server; the registry holds nothing but the client.

use std::collections::HashSet;

use cloudavenue_api::infra::models::EdgeRecord;
use cloudavenue_api::openapi::models::EdgeGatewayRecord;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::Client;
use crate::edge::bandwidth::{DEFAULT_BANDWIDTH, Tier0Capacity};
use crate::edge::services;
use crate::edge::{EdgeGateway, EdgeIdentity, OwnerKind, OwnerRef};
use crate::error::{ApiResultExt, CoreError};
use crate::urn::{self, UrnKind};

/// Parameters of a new edge gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeCreateRequest {
    /// Owner URN, or owner name. Falls back to the configured VDC.
    pub owner: Option<String>,
    /// Kind of a name-only owner. URN owners carry their kind.
    pub owner_kind: Option<OwnerKind>,
    /// Uplink Tier-0 VRF. The platform picks one when absent.
    pub tier0: Option<String>,
    /// Mbps; defaults to 5.
    pub bandwidth: Option<u32>,
}

/// Entry point for edge gateway lifecycle operations.
pub struct EdgeRegistry {
    client: Client,
}

impl Client {
    pub fn edges(&self) -> EdgeRegistry {
        EdgeRegistry {
            client: self.clone(),
        }
    }
}

impl EdgeRegistry {
    /// All edge gateways of the organization.
    ///
    /// The InfraAPI view of every edge is fetched concurrently; any failure
    /// fails the whole listing.
    pub async fn list(&self) -> Result<Vec<EdgeGateway>, CoreError> {
        let api = self.client.api();
        let gateways = api
            .list_edge_gateways()
            .await
            .on("list edge gateways")?;
        debug!(count = gateways.len(), "listing edge gateways");

        let identities = try_join_all(gateways.into_iter().map(|gateway| async move {
            let infra = api.get_edge(&gateway.id).await.on("get edge")?;
            EdgeIdentity::reconcile(gateway, &infra)
        }))
        .await?;

        let tree = api
            .get_network_services()
            .await
            .on("get network services")?;

        Ok(identities
            .into_iter()
            .map(|identity| {
                let services =
                    services::reconcile(&tree, &identity.tier0, urn::extract_uuid(&identity.id));
                EdgeGateway::assemble(self.client.clone(), identity, services)
            })
            .collect())
    }

    /// One edge gateway by URN or by name.
    pub async fn get(&self, name_or_urn: &str) -> Result<EdgeGateway, CoreError> {
        if name_or_urn.is_empty() {
            return Err(CoreError::empty("edge gateway name or id"));
        }

        let (gateway, infra) = if urn::is_kind(name_or_urn, UrnKind::EdgeGateway) {
            tokio::try_join!(
                self.gateway_by_id(name_or_urn),
                self.infra_by_id(name_or_urn)
            )?
        } else {
            tokio::try_join!(
                self.gateway_by_name(name_or_urn),
                self.infra_by_name(name_or_urn)
            )?
        };
        let identity = EdgeIdentity::reconcile(gateway, &infra)?;

        let tree = self
            .client
            .api()
            .get_network_services()
            .await
            .on("get network services")?;
        let services =
            services::reconcile(&tree, &identity.tier0, urn::extract_uuid(&identity.id));

        Ok(EdgeGateway::assemble(self.client.clone(), identity, services))
    }

    /// Create an edge gateway and wait until it is usable.
    ///
    /// The platform does not return the new edge's id: the edge list is
    /// snapshotted before the call and diffed after the job completes.
    pub async fn create(&self, request: EdgeCreateRequest) -> Result<EdgeGateway, CoreError> {
        let api = self.client.api();
        let owner = self.resolve_owner(&request).await?;
        let tier0 = request.tier0.clone().unwrap_or_default();
        let bandwidth = request.bandwidth.unwrap_or(DEFAULT_BANDWIDTH);

        let before = api.list_edges().await.on("list edges")?;
        if !tier0.is_empty() {
            let class = self.client.tier0s().get(&tier0).await?.class;
            let used: Vec<u32> = before
                .iter()
                .filter(|edge| edge.tier0_vrf_id == tier0)
                .map(|edge| edge.rate_limit)
                .collect();
            let capacity = Tier0Capacity::new(&tier0, class, &used);
            capacity.remaining()?;
            capacity.ensure_fits(bandwidth, 0)?;
        }

        info!(owner = %owner.name, kind = %owner.kind, tier0 = %tier0, "creating edge gateway");
        let job = match owner.kind {
            OwnerKind::Vdc => api.create_edge_in_vdc(&owner.name, &tier0).await,
            OwnerKind::VdcGroup => api.create_edge_in_vdc_group(&owner.name, &tier0).await,
        }
        .on("create edge gateway")?;
        self.client.wait_job(&job).await?;

        let after = api.list_edges().await.on("list edges")?;
        let edge_id = pick_new_edge(&before, after, &owner.name)?;
        debug!(edge_id = %edge_id, "new edge gateway identified");

        if bandwidth != DEFAULT_BANDWIDTH {
            self.update(&edge_id, bandwidth).await?;
        }

        let edge = self.get(&edge_id).await?;
        info!(edge = %edge.name, id = %edge.id, bandwidth = edge.bandwidth, "edge gateway created");
        Ok(edge)
    }

    /// Change the bandwidth of an edge.
    ///
    /// The value must be on the ladder of the edge's Tier-0 class and fit in
    /// the remaining capacity plus the edge's current allocation.
    pub async fn update(&self, edge_id: &str, bandwidth: u32) -> Result<(), CoreError> {
        let api = self.client.api();
        let current = self.infra_by_id(edge_id).await?;
        if current.tier0_vrf_id.is_empty() {
            return Err(CoreError::empty("edge gateway tier-0"));
        }

        let capacity = self.client.tier0s().capacity(&current.tier0_vrf_id).await?;
        capacity.ensure_fits(bandwidth, current.rate_limit)?;

        let job = api
            .update_edge_rate_limit(edge_id, bandwidth)
            .await
            .on("update edge gateway")?;
        self.client.wait_job(&job).await?;
        info!(edge_id, bandwidth, "edge gateway bandwidth updated");
        Ok(())
    }

    /// Delete an edge gateway by URN or by name.
    pub async fn delete(&self, name_or_urn: &str) -> Result<(), CoreError> {
        let edge_id = if urn::is_kind(name_or_urn, UrnKind::EdgeGateway) {
            name_or_urn.to_owned()
        } else {
            self.gateway_by_name(name_or_urn).await?.id
        };

        let job = self
            .client
            .api()
            .delete_edge(&edge_id)
            .await
            .on("delete edge gateway")?;
        self.client.wait_job(&job).await?;
        info!(edge_id = %edge_id, "edge gateway deleted");
        Ok(())
    }

    // ── Lookups ──────────────────────────────────────────────────────

    async fn gateway_by_id(&self, id: &str) -> Result<EdgeGatewayRecord, CoreError> {
        self.client
            .api()
            .get_edge_gateway(id)
            .await
            .map_err(|e| lookup_error(e, id))
    }

    async fn gateway_by_name(&self, name: &str) -> Result<EdgeGatewayRecord, CoreError> {
        self.client
            .api()
            .get_edge_gateway_by_name(name)
            .await
            .map_err(|e| lookup_error(e, name))
    }

    async fn infra_by_id(&self, id: &str) -> Result<EdgeRecord, CoreError> {
        self.client
            .api()
            .get_edge(id)
            .await
            .map_err(|e| lookup_error(e, id))
    }

    async fn infra_by_name(&self, name: &str) -> Result<EdgeRecord, CoreError> {
        self.client
            .api()
            .list_edges()
            .await
            .on("list edges")?
            .into_iter()
            .find(|edge| edge.edge_name == name)
            .ok_or_else(|| CoreError::not_found("edge gateway", name))
    }

    /// Owner of a new edge, with both its id and its name.
    async fn resolve_owner(&self, request: &EdgeCreateRequest) -> Result<OwnerRef, CoreError> {
        let api = self.client.api();
        let owner = request
            .owner
            .clone()
            .or_else(|| self.client.config().vdc.clone())
            .filter(|o| !o.is_empty())
            .ok_or_else(|| CoreError::empty("edge gateway owner"))?;

        if let Some(kind) = OwnerKind::of_urn(&owner) {
            let name = match kind {
                OwnerKind::Vdc => api.get_vdc(&owner).await.map(|v| v.name),
                OwnerKind::VdcGroup => api.get_vdc_group(&owner).await.map(|g| g.name),
            }
            .map_err(|e| lookup_error(e, &owner))?;
            return Ok(OwnerRef {
                id: owner,
                name,
                kind,
            });
        }

        if urn::is_urn(&owner) {
            return Err(CoreError::invalid(
                "edge gateway owner",
                format!("{owner} is neither a vdc nor a vdc group"),
            ));
        }

        let kind = request.owner_kind.unwrap_or(OwnerKind::Vdc);
        let id = match kind {
            OwnerKind::Vdc => api.get_vdc_by_name(&owner).await.map(|v| v.id),
            OwnerKind::VdcGroup => api.get_vdc_group_by_name(&owner).await.map(|g| g.id),
        }
        .map_err(|e| lookup_error(e, &owner))?;
        Ok(OwnerRef {
            id,
            name: owner,
            kind,
        })
    }
}

fn lookup_error(err: cloudavenue_api::Error, identifier: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::not_found("edge gateway", identifier)
    } else {
        CoreError::from(err)
    }
}

/// Id of the single edge present in `after` but not in `before`.
///
/// When concurrent creations elsewhere in the organization produce several
/// candidates, only those belonging to `owner_name` are kept.
fn pick_new_edge(
    before: &[EdgeRecord],
    after: Vec<EdgeRecord>,
    owner_name: &str,
) -> Result<String, CoreError> {
    let known: HashSet<&str> = before.iter().map(|e| e.edge_id.as_str()).collect();
    let mut fresh: Vec<EdgeRecord> = after
        .into_iter()
        .filter(|e| !known.contains(e.edge_id.as_str()))
        .collect();

    if fresh.len() > 1 {
        fresh.retain(|e| e.owner_name == owner_name);
    }

    match fresh.len() {
        0 => Err(CoreError::not_found("new edge gateway", owner_name)),
        1 => Ok(fresh.remove(0).edge_id),
        count => Err(CoreError::Ambiguous {
            entity: "new edge gateway".into(),
            name: owner_name.to_owned(),
            count,
        }),
    }
}
