// InfraAPI edge gateway endpoints
//
// Creation is scoped to the owner (VDC or VDC group, addressed by name);
// reads, bandwidth updates, and deletion are addressed by edge id.

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::infra::models::{
    CreateEdgeBody, EdgeNetworkRecord, EdgeRecord, JobHandle, UpdateEdgeBody,
};

const EDGES: &str = "/api/customers/v2.0/edges";
const EDGE: &str = "/api/customers/v2.0/edges/{edgeId}";
const EDGE_NETWORKS: &str = "/api/customers/v2.0/edges/{edgeId}/networks";
const VDC_EDGES: &str = "/api/customers/v2.0/vdcs/{vdcName}/edges";
const VDC_GROUP_EDGES: &str = "/api/customers/v2.0/vdc-groups/{vdcGroupName}/edges";

impl ApiClient {
    /// List every edge gateway of the organization.
    ///
    /// `GET /api/customers/v2.0/edges`
    pub async fn list_edges(&self) -> Result<Vec<EdgeRecord>, Error> {
        debug!("listing edges");
        self.get(EDGES).await
    }

    /// `GET /api/customers/v2.0/edges/{edgeId}`
    pub async fn get_edge(&self, edge_id: &str) -> Result<EdgeRecord, Error> {
        self.get(&interpolate(EDGE, &[("edgeId", edge_id)])).await
    }

    /// Create an edge gateway owned by a VDC.
    ///
    /// `POST /api/customers/v2.0/vdcs/{vdcName}/edges`
    pub async fn create_edge_in_vdc(
        &self,
        vdc_name: &str,
        tier0_vrf_id: &str,
    ) -> Result<JobHandle, Error> {
        debug!(vdc_name, tier0_vrf_id, "creating edge in vdc");
        let body = CreateEdgeBody {
            tier0_vrf_id: tier0_vrf_id.to_owned(),
        };
        self.post(&interpolate(VDC_EDGES, &[("vdcName", vdc_name)]), &body)
            .await
    }

    /// Create an edge gateway owned by a VDC group.
    ///
    /// `POST /api/customers/v2.0/vdc-groups/{vdcGroupName}/edges`
    pub async fn create_edge_in_vdc_group(
        &self,
        vdc_group_name: &str,
        tier0_vrf_id: &str,
    ) -> Result<JobHandle, Error> {
        debug!(vdc_group_name, tier0_vrf_id, "creating edge in vdc group");
        let body = CreateEdgeBody {
            tier0_vrf_id: tier0_vrf_id.to_owned(),
        };
        self.post(
            &interpolate(VDC_GROUP_EDGES, &[("vdcGroupName", vdc_group_name)]),
            &body,
        )
        .await
    }

    /// Change the bandwidth allocated to an edge.
    ///
    /// `PUT /api/customers/v2.0/edges/{edgeId}` with `{"rateLimit": n}`
    pub async fn update_edge_rate_limit(
        &self,
        edge_id: &str,
        rate_limit: u32,
    ) -> Result<JobHandle, Error> {
        debug!(edge_id, rate_limit, "updating edge bandwidth");
        self.put(
            &interpolate(EDGE, &[("edgeId", edge_id)]),
            &UpdateEdgeBody { rate_limit },
        )
        .await
    }

    /// `DELETE /api/customers/v2.0/edges/{edgeId}`
    pub async fn delete_edge(&self, edge_id: &str) -> Result<JobHandle, Error> {
        debug!(edge_id, "deleting edge");
        self.delete(&interpolate(EDGE, &[("edgeId", edge_id)])).await
    }

    /// `GET /api/customers/v2.0/edges/{edgeId}/networks`
    pub async fn list_edge_networks(&self, edge_id: &str) -> Result<Vec<EdgeNetworkRecord>, Error> {
        self.get(&interpolate(EDGE_NETWORKS, &[("edgeId", edge_id)]))
            .await
    }
}
