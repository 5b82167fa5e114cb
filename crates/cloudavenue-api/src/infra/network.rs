// InfraAPI network service endpoints

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::infra::models::{
    CreateServiceBody, CreateServiceProperties, JobHandle, NetworkServiceNode,
};

const NETWORK: &str = "/api/customers/v2.0/network";
const SERVICES: &str = "/api/customers/v2.0/services";
const SERVICE: &str = "/api/customers/v2.0/services/{serviceId}";

impl ApiClient {
    /// Fetch the organization-wide network service tree.
    ///
    /// `GET /api/customers/v2.0/network`
    pub async fn get_network_services(&self) -> Result<Vec<NetworkServiceNode>, Error> {
        debug!("fetching network service tree");
        self.get(NETWORK).await
    }

    /// Attach a network service to an edge gateway.
    ///
    /// `POST /api/customers/v2.0/services`
    pub async fn create_network_service(
        &self,
        network_type: &str,
        edge_uuid: &str,
        prefix_length: u8,
    ) -> Result<JobHandle, Error> {
        debug!(network_type, edge_uuid, prefix_length, "creating network service");
        let body = CreateServiceBody {
            network_type: network_type.to_owned(),
            edge_gateway: edge_uuid.to_owned(),
            properties: CreateServiceProperties { prefix_length },
        };
        self.post(SERVICES, &body).await
    }

    /// `DELETE /api/customers/v2.0/services/{serviceId}`
    pub async fn delete_network_service(&self, service_id: &str) -> Result<JobHandle, Error> {
        debug!(service_id, "deleting network service");
        self.delete(&interpolate(SERVICE, &[("serviceId", service_id)]))
            .await
    }
}
