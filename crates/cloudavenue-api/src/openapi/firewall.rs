// OpenAPI edge gateway firewall endpoints
//
// The rules resource is replaced as a whole: a PUT carries the complete
// user-defined bucket. System and default rules are read-only.

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::models::{FirewallRuleRecord, FirewallRulesRecord, TaskRef};

const RULES: &str = "/cloudapi/1.0.0/edgeGateways/{gatewayId}/firewall/rules";
const RULE: &str = "/cloudapi/1.0.0/edgeGateways/{gatewayId}/firewall/rules/{ruleId}";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/edgeGateways/{gatewayId}/firewall/rules`
    pub async fn get_edge_firewall_rules(&self, gateway_id: &str) -> Result<FirewallRulesRecord, Error> {
        self.get(&interpolate(RULES, &[("gatewayId", gateway_id)]))
            .await
    }

    /// Replace the user-defined bucket.
    ///
    /// `PUT /cloudapi/1.0.0/edgeGateways/{gatewayId}/firewall/rules`
    pub async fn put_edge_firewall_rules(
        &self,
        gateway_id: &str,
        rules: Vec<FirewallRuleRecord>,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(gateway_id, count = rules.len(), "replacing edge firewall rules");
        let body = FirewallRulesRecord {
            user_defined_rules: rules,
            ..FirewallRulesRecord::default()
        };
        self.put_task(&interpolate(RULES, &[("gatewayId", gateway_id)]), &body)
            .await
    }

    /// `DELETE /cloudapi/1.0.0/edgeGateways/{gatewayId}/firewall/rules/{ruleId}`
    pub async fn delete_edge_firewall_rule(
        &self,
        gateway_id: &str,
        rule_id: &str,
    ) -> Result<Option<TaskRef>, Error> {
        debug!(gateway_id, rule_id, "deleting edge firewall rule");
        self.delete_task(
            &interpolate(RULE, &[("gatewayId", gateway_id), ("ruleId", rule_id)]),
            &[],
        )
        .await
    }

    /// Drop every user-defined rule.
    ///
    /// `DELETE /cloudapi/1.0.0/edgeGateways/{gatewayId}/firewall/rules`
    pub async fn delete_edge_firewall_rules(&self, gateway_id: &str) -> Result<Option<TaskRef>, Error> {
        debug!(gateway_id, "deleting all edge firewall rules");
        self.delete_task(&interpolate(RULES, &[("gatewayId", gateway_id)]), &[])
            .await
    }
}
