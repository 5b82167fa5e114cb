// ── VCDA allow-list ──
//
// On-premise IPs allowed to reach the organization's VMware Cloud Director
// Availability endpoint.

use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::validate;

pub struct Vcda {
    client: Client,
}

impl Client {
    pub fn vcda(&self) -> Vcda {
        Vcda {
            client: self.clone(),
        }
    }
}

impl Vcda {
    pub async fn list(&self) -> Result<Vec<String>, CoreError> {
        self.client.api().list_vcda_ips().await.on("list vcda ips")
    }

    pub async fn register(&self, ip: &str) -> Result<(), CoreError> {
        check(ip)?;
        let job = self.client.api().add_vcda_ip(ip).await.on("register vcda ip")?;
        self.client.wait_job(&job).await?;
        info!(ip, "vcda ip registered");
        Ok(())
    }

    pub async fn unregister(&self, ip: &str) -> Result<(), CoreError> {
        check(ip)?;
        let job = self
            .client
            .api()
            .remove_vcda_ip(ip)
            .await
            .on("unregister vcda ip")?;
        self.client.wait_job(&job).await?;
        info!(ip, "vcda ip unregistered");
        Ok(())
    }
}

fn check(ip: &str) -> Result<(), CoreError> {
    if ip.is_empty() {
        return Err(CoreError::empty("vcda ip"));
    }
    if !validate::is_ipv4(ip) {
        return Err(CoreError::invalid("vcda ip", format!("{ip} is not an IPv4 address")));
    }
    Ok(())
}
