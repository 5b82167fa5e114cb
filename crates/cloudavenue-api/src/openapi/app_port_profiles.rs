// OpenAPI application port profile endpoints

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::models::{AppPortProfileRecord, TaskRef};

const PROFILES: &str = "/cloudapi/1.0.0/applicationPortProfiles";
const PROFILE: &str = "/cloudapi/1.0.0/applicationPortProfiles/{profileId}";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/applicationPortProfiles` (all pages, FIQL filter)
    pub async fn list_app_port_profiles(&self, filter: &str) -> Result<Vec<AppPortProfileRecord>, Error> {
        self.get_all_pages(PROFILES, Some(filter)).await
    }

    /// `GET /cloudapi/1.0.0/applicationPortProfiles/{profileId}`
    pub async fn get_app_port_profile(&self, profile_id: &str) -> Result<AppPortProfileRecord, Error> {
        self.get(&interpolate(PROFILE, &[("profileId", profile_id)]))
            .await
    }

    /// `POST /cloudapi/1.0.0/applicationPortProfiles`
    pub async fn create_app_port_profile(
        &self,
        profile: &AppPortProfileRecord,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(name = %profile.name, "creating application port profile");
        self.post_task(PROFILES, profile).await
    }

    /// `PUT /cloudapi/1.0.0/applicationPortProfiles/{profileId}`
    pub async fn update_app_port_profile(
        &self,
        profile_id: &str,
        profile: &AppPortProfileRecord,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(profile_id, "updating application port profile");
        self.put_task(&interpolate(PROFILE, &[("profileId", profile_id)]), profile)
            .await
    }

    /// `DELETE /cloudapi/1.0.0/applicationPortProfiles/{profileId}`
    pub async fn delete_app_port_profile(&self, profile_id: &str) -> Result<Option<TaskRef>, Error> {
        debug!(profile_id, "deleting application port profile");
        self.delete_task(&interpolate(PROFILE, &[("profileId", profile_id)]), &[])
            .await
    }
}
