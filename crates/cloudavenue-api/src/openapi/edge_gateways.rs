// OpenAPI edge gateway endpoints

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::fiql_eq;
use crate::openapi::models::EdgeGatewayRecord;

const EDGE_GATEWAYS: &str = "/cloudapi/1.0.0/edgeGateways";
const EDGE_GATEWAY: &str = "/cloudapi/1.0.0/edgeGateways/{gatewayId}";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/edgeGateways` (all pages)
    pub async fn list_edge_gateways(&self) -> Result<Vec<EdgeGatewayRecord>, Error> {
        self.get_all_pages(EDGE_GATEWAYS, None).await
    }

    /// `GET /cloudapi/1.0.0/edgeGateways/{gatewayId}`
    pub async fn get_edge_gateway(&self, gateway_id: &str) -> Result<EdgeGatewayRecord, Error> {
        self.get(&interpolate(EDGE_GATEWAY, &[("gatewayId", gateway_id)]))
            .await
    }

    /// Look an edge gateway up by its exact name.
    ///
    /// Answers `NotFound` when the filtered collection is empty.
    pub async fn get_edge_gateway_by_name(&self, name: &str) -> Result<EdgeGatewayRecord, Error> {
        let filter = fiql_eq("name", name);
        self.get_all_pages::<EdgeGatewayRecord>(EDGE_GATEWAYS, Some(&filter))
            .await?
            .into_iter()
            .find(|gw| gw.name == name)
            .ok_or_else(|| Error::NotFound {
                path: EDGE_GATEWAYS.to_owned(),
                message: format!("edge gateway {name} not found"),
            })
    }
}
