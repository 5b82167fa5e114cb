//! Tier-0 VRF command handlers.

use tabled::Tabled;

use cloudavenue_core::{Client, Tier0, Tier0Capacity};

use crate::cli::{GlobalOpts, Tier0Args, Tier0Command};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct Tier0Row {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Capacity (Mbps)")]
    capacity: u32,
    #[tabled(rename = "Services")]
    services: usize,
}

impl From<&Tier0> for Tier0Row {
    fn from(t: &Tier0) -> Self {
        Self {
            name: t.name.clone(),
            class: t.class.to_string(),
            capacity: t.class.capacity(),
            services: t.services.len(),
        }
    }
}

fn capacity_detail(c: &Tier0Capacity) -> String {
    let ladder = c
        .class
        .ladder()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    [
        format!("Tier-0:     {}", c.tier0),
        format!("Class:      {}", c.class),
        format!("Total:      {} Mbps", c.total),
        format!("Allocated:  {} Mbps", c.allocated),
        format!("Available:  {} Mbps", c.available()),
        format!("Bandwidths: {ladder}"),
    ]
    .join("\n")
}

pub async fn handle(client: &Client, args: Tier0Args, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        Tier0Command::List => {
            let tier0s = client.tier0s().list().await?;
            let out = output::render_list(&global.output, &tier0s, |t| Tier0Row::from(t), |t| {
                t.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        Tier0Command::Capacity { name } => {
            let capacity = client.tier0s().capacity(&name).await?;
            let out = output::render_single(&global.output, &capacity, capacity_detail, |c| {
                c.available().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
