//! Edge firewall command handlers.

use tabled::Tabled;

use cloudavenue_core::{Client, FirewallRule};

use crate::cli::{FirewallArgs, FirewallCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Priority")]
    priority: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Logging")]
    logging: String,
}

impl RuleRow {
    fn new(rule: &FirewallRule, color: bool) -> Self {
        Self {
            priority: rule.priority,
            name: rule.name.clone(),
            action: rule.action.to_string(),
            direction: rule.direction.to_string(),
            protocol: rule.ip_protocol.to_string(),
            enabled: output::flag(rule.enabled, color),
            logging: output::flag(rule.logging, color),
        }
    }
}

pub async fn handle(client: &Client, args: FirewallArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        FirewallCommand::Rules { edge } => {
            let rules = client.edges().get(&edge).await?.firewall().list().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &rules,
                |r| RuleRow::new(r, color),
                |r| r.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FirewallCommand::DeleteAll { edge } => {
            if !util::confirm(
                &format!("Delete every firewall rule of {edge}?"),
                "firewall delete-all",
                global.yes,
            )? {
                return Ok(());
            }
            client.edges().get(&edge).await?.firewall().delete_all().await?;
            output::status(&format!("Firewall rules of {edge} deleted"), global.quiet);
            Ok(())
        }
    }
}
