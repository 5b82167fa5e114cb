// ── Edge gateway firewall ──

use cloudavenue_api::openapi::models::FirewallRuleRecord;
use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::firewall::{self, FirewallRule, RuleStore};

/// User-defined rules of one edge gateway firewall.
pub struct EdgeFirewall {
    client: Client,
    edge_id: String,
}

impl EdgeFirewall {
    pub fn new(client: Client, edge_id: impl Into<String>) -> Self {
        Self {
            client,
            edge_id: edge_id.into(),
        }
    }

    pub fn edge_id(&self) -> &str {
        &self.edge_id
    }

    /// Rules ordered by `(priority, name)`.
    pub async fn list(&self) -> Result<Vec<FirewallRule>, CoreError> {
        firewall::list_rules(self).await
    }

    pub async fn get(&self, name_or_id: &str) -> Result<FirewallRule, CoreError> {
        self.list()
            .await?
            .into_iter()
            .find(|r| r.id.as_deref() == Some(name_or_id) || r.name == name_or_id)
            .ok_or_else(|| CoreError::not_found("firewall rule", name_or_id))
    }

    pub async fn create(&self, rules: Vec<FirewallRule>) -> Result<(), CoreError> {
        let count = rules.len();
        firewall::create_rules(self, rules).await?;
        info!(edge_id = %self.edge_id, count, "edge firewall rules created");
        Ok(())
    }

    pub async fn update(&self, rules: Vec<FirewallRule>) -> Result<(), CoreError> {
        let count = rules.len();
        firewall::update_rules(self, rules).await?;
        info!(edge_id = %self.edge_id, count, "edge firewall rules updated");
        Ok(())
    }

    /// Delete rules one at a time, stopping at the first failure.
    pub async fn delete_many(&self, rule_ids: &[String]) -> Result<(), CoreError> {
        for rule_id in rule_ids {
            let task = self
                .client
                .api()
                .delete_edge_firewall_rule(&self.edge_id, rule_id)
                .await
                .on("delete firewall rule")?;
            self.client.wait_task(task).await?;
            info!(edge_id = %self.edge_id, rule_id = %rule_id, "edge firewall rule deleted");
        }
        Ok(())
    }

    /// Drop every user-defined rule.
    pub async fn delete_all(&self) -> Result<(), CoreError> {
        let task = self
            .client
            .api()
            .delete_edge_firewall_rules(&self.edge_id)
            .await
            .on("delete firewall rules")?;
        self.client.wait_task(task).await?;
        info!(edge_id = %self.edge_id, "edge firewall rules cleared");
        Ok(())
    }
}

impl RuleStore for EdgeFirewall {
    async fn fetch(&self) -> Result<Vec<FirewallRuleRecord>, CoreError> {
        let rules = self
            .client
            .api()
            .get_edge_firewall_rules(&self.edge_id)
            .await
            .on("get firewall rules")?;
        Ok(rules.user_defined_rules)
    }

    async fn replace(&self, rules: Vec<FirewallRuleRecord>) -> Result<(), CoreError> {
        let task = self
            .client
            .api()
            .put_edge_firewall_rules(&self.edge_id, rules)
            .await
            .on("update firewall rules")?;
        self.client.wait_task(task).await?;
        Ok(())
    }
}
