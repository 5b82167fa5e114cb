// InfraAPI Tier-0 VRF endpoints

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::infra::models::Tier0Record;

const TIER0S: &str = "/api/customers/v2.0/tier-0-vrfs";
const TIER0: &str = "/api/customers/v2.0/tier-0-vrfs/{tier0VrfName}";

impl ApiClient {
    /// Names of the Tier-0 VRFs available to the organization.
    ///
    /// `GET /api/customers/v2.0/tier-0-vrfs`
    pub async fn list_tier0_vrfs(&self) -> Result<Vec<String>, Error> {
        self.get(TIER0S).await
    }

    /// `GET /api/customers/v2.0/tier-0-vrfs/{tier0VrfName}`
    pub async fn get_tier0_vrf(&self, name: &str) -> Result<Tier0Record, Error> {
        self.get(&interpolate(TIER0, &[("tier0VrfName", name)]))
            .await
    }
}
