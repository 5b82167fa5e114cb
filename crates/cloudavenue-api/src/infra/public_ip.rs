// InfraAPI public IP endpoints
//
// Listing is served by v2.0; allocation and release are still v1.0.

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::infra::models::{JobHandle, PublicIpsResponse};

const IPS: &str = "/api/customers/v2.0/ip";
const IPS_V1: &str = "/api/customers/v1.0/ip";
const IP_V1: &str = "/api/customers/v1.0/ip/{ip}/";

impl ApiClient {
    /// `GET /api/customers/v2.0/ip`
    pub async fn list_public_ips(&self) -> Result<PublicIpsResponse, Error> {
        self.get(IPS).await
    }

    /// Allocate a public IP and NAT it to an edge gateway.
    ///
    /// `POST /api/customers/v1.0/ip?edgeGatewayName=...`
    pub async fn create_public_ip(&self, edge_gateway_name: &str) -> Result<JobHandle, Error> {
        debug!(edge_gateway_name, "allocating public ip");
        self.post_with_params(
            IPS_V1,
            &[("edgeGatewayName", edge_gateway_name.to_owned())],
            &serde_json::json!({}),
        )
        .await
    }

    /// `DELETE /api/customers/v1.0/ip/{ip}/`
    pub async fn delete_public_ip(&self, ip: &str) -> Result<JobHandle, Error> {
        debug!(ip, "releasing public ip");
        self.delete(&interpolate(IP_V1, &[("ip", ip)])).await
    }
}
