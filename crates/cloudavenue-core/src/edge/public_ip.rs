// ── Public IPs ──

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::validate;

/// A public IP NATed on an edge gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicIp {
    pub uplink_ip: String,
    pub translated_ip: Option<String>,
    pub edge_gateway_name: String,
}

pub struct PublicIps {
    client: Client,
}

impl Client {
    pub fn public_ips(&self) -> PublicIps {
        PublicIps {
            client: self.clone(),
        }
    }
}

impl PublicIps {
    pub async fn list(&self) -> Result<Vec<PublicIp>, CoreError> {
        let response = self
            .client
            .api()
            .list_public_ips()
            .await
            .on("list public ips")?;
        Ok(response
            .network_config
            .into_iter()
            .map(|r| PublicIp {
                uplink_ip: r.uplink_ip,
                translated_ip: r.translated_ip,
                edge_gateway_name: r.edge_gateway_name,
            })
            .collect())
    }

    pub async fn get(&self, ip: &str) -> Result<PublicIp, CoreError> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.uplink_ip == ip)
            .ok_or_else(|| CoreError::not_found("public ip", ip))
    }

    /// Allocate a public IP on `edge_gateway_name` and return it.
    pub async fn create(&self, edge_gateway_name: &str) -> Result<PublicIp, CoreError> {
        if edge_gateway_name.is_empty() {
            return Err(CoreError::empty("edge gateway name"));
        }
        let before: HashSet<String> = self.list().await?.into_iter().map(|p| p.uplink_ip).collect();

        let job = self
            .client
            .api()
            .create_public_ip(edge_gateway_name)
            .await
            .on("create public ip")?;
        self.client.wait_job(&job).await?;

        let ip = self
            .list()
            .await?
            .into_iter()
            .find(|p| p.edge_gateway_name == edge_gateway_name && !before.contains(&p.uplink_ip))
            .ok_or_else(|| CoreError::not_found("new public ip", edge_gateway_name))?;
        info!(ip = %ip.uplink_ip, edge = edge_gateway_name, "public ip allocated");
        Ok(ip)
    }

    pub async fn delete(&self, ip: &str) -> Result<(), CoreError> {
        if !validate::is_ipv4(ip) {
            return Err(CoreError::invalid("public ip", format!("{ip} is not an IPv4 address")));
        }
        let job = self
            .client
            .api()
            .delete_public_ip(ip)
            .await
            .on("delete public ip")?;
        self.client.wait_job(&job).await?;
        info!(ip, "public ip released");
        Ok(())
    }
}
