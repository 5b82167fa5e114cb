// OpenAPI firewall group endpoints (security groups, IP sets, dynamic groups)

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::models::{FirewallGroupRecord, TaskRef};

const GROUPS: &str = "/cloudapi/1.0.0/firewallGroups";
const GROUP: &str = "/cloudapi/1.0.0/firewallGroups/{groupId}";
const GROUPS_SUMMARIES: &str = "/cloudapi/1.0.0/firewallGroups/summaries";

impl ApiClient {
    /// List firewall groups matching a FIQL filter.
    ///
    /// `GET /cloudapi/1.0.0/firewallGroups/summaries` (all pages)
    pub async fn list_firewall_groups(&self, filter: &str) -> Result<Vec<FirewallGroupRecord>, Error> {
        self.get_all_pages(GROUPS_SUMMARIES, Some(filter)).await
    }

    /// `GET /cloudapi/1.0.0/firewallGroups/{groupId}`
    pub async fn get_firewall_group(&self, group_id: &str) -> Result<FirewallGroupRecord, Error> {
        self.get(&interpolate(GROUP, &[("groupId", group_id)])).await
    }

    /// `POST /cloudapi/1.0.0/firewallGroups`
    pub async fn create_firewall_group(&self, group: &FirewallGroupRecord) -> Result<Option<TaskRef>, Error> {
        debug!(name = %group.name, kind = %group.type_value, "creating firewall group");
        self.post_task(GROUPS, group).await
    }

    /// `PUT /cloudapi/1.0.0/firewallGroups/{groupId}`
    pub async fn update_firewall_group(
        &self,
        group_id: &str,
        group: &FirewallGroupRecord,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(group_id, "updating firewall group");
        self.put_task(&interpolate(GROUP, &[("groupId", group_id)]), group)
            .await
    }

    /// `DELETE /cloudapi/1.0.0/firewallGroups/{groupId}`
    pub async fn delete_firewall_group(&self, group_id: &str) -> Result<Option<TaskRef>, Error> {
        debug!(group_id, "deleting firewall group");
        self.delete_task(&interpolate(GROUP, &[("groupId", group_id)]), &[])
            .await
    }
}
