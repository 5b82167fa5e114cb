// OpenAPI VDC group distributed firewall endpoints

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::models::{
    DfwPoliciesRecord, DfwPolicyRecord, DfwRulesRecord, FirewallRuleRecord, TaskRef,
};

const POLICIES: &str = "/cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies";
const DEFAULT_POLICY: &str = "/cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies/default";
const DEFAULT_RULES: &str = "/cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies/default/rules";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies`
    pub async fn get_dfw_policies(&self, vdc_group_id: &str) -> Result<DfwPoliciesRecord, Error> {
        self.get(&interpolate(POLICIES, &[("vdcGroupId", vdc_group_id)]))
            .await
    }

    /// `PUT /cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies`
    pub async fn put_dfw_policies(
        &self,
        vdc_group_id: &str,
        policies: &DfwPoliciesRecord,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(vdc_group_id, enabled = policies.enabled, "updating dfw policies");
        self.put_task(&interpolate(POLICIES, &[("vdcGroupId", vdc_group_id)]), policies)
            .await
    }

    /// `GET /cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies/default`
    pub async fn get_dfw_default_policy(&self, vdc_group_id: &str) -> Result<DfwPolicyRecord, Error> {
        self.get(&interpolate(DEFAULT_POLICY, &[("vdcGroupId", vdc_group_id)]))
            .await
    }

    /// `PUT /cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies/default`
    pub async fn put_dfw_default_policy(
        &self,
        vdc_group_id: &str,
        policy: &DfwPolicyRecord,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(vdc_group_id, enabled = policy.enabled, "updating dfw default policy");
        self.put_task(&interpolate(DEFAULT_POLICY, &[("vdcGroupId", vdc_group_id)]), policy)
            .await
    }

    /// `GET /cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies/default/rules`
    pub async fn get_dfw_rules(&self, vdc_group_id: &str) -> Result<DfwRulesRecord, Error> {
        self.get(&interpolate(DEFAULT_RULES, &[("vdcGroupId", vdc_group_id)]))
            .await
    }

    /// Replace the rules of the default policy.
    ///
    /// `PUT /cloudapi/1.0.0/vdcGroups/{vdcGroupId}/dfwPolicies/default/rules`
    pub async fn put_dfw_rules(
        &self,
        vdc_group_id: &str,
        rules: Vec<FirewallRuleRecord>,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(vdc_group_id, count = rules.len(), "replacing dfw rules");
        self.put_task(
            &interpolate(DEFAULT_RULES, &[("vdcGroupId", vdc_group_id)]),
            &DfwRulesRecord { values: rules },
        )
        .await
    }
}
