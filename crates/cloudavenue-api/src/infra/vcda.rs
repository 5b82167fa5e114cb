// InfraAPI VCDA allow-list endpoints

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::infra::models::JobHandle;

const VCDA_IPS: &str = "/api/customers/v2.0/vcda/ips";
const VCDA_IP: &str = "/api/customers/v2.0/vcda/ips/{ip}/";

impl ApiClient {
    /// On-premise IPs allowed to reach the VCDA replication endpoint.
    ///
    /// `GET /api/customers/v2.0/vcda/ips`
    pub async fn list_vcda_ips(&self) -> Result<Vec<String>, Error> {
        self.get(VCDA_IPS).await
    }

    /// `POST /api/customers/v2.0/vcda/ips/{ip}/`
    pub async fn add_vcda_ip(&self, ip: &str) -> Result<JobHandle, Error> {
        debug!(ip, "allowing vcda ip");
        self.post(&interpolate(VCDA_IP, &[("ip", ip)]), &serde_json::json!({}))
            .await
    }

    /// `DELETE /api/customers/v2.0/vcda/ips/{ip}/`
    pub async fn remove_vcda_ip(&self, ip: &str) -> Result<JobHandle, Error> {
        debug!(ip, "removing vcda ip");
        self.delete(&interpolate(VCDA_IP, &[("ip", ip)])).await
    }
}
