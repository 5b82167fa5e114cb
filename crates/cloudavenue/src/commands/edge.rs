//! Edge gateway command handlers.

use tabled::Tabled;

use cloudavenue_core::{Client, EdgeCreateRequest, EdgeGateway, EdgeNetwork, EdgeServices, OwnerKind};

use crate::cli::{EdgeArgs, EdgeCommand, GlobalOpts, OwnerKindArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Tier-0")]
    tier0: String,
    #[tabled(rename = "Mbps")]
    bandwidth: u32,
    #[tabled(rename = "Public IPs")]
    public_ips: usize,
    #[tabled(rename = "Services")]
    services: String,
}

impl EdgeRow {
    fn new(edge: &EdgeGateway, color: bool) -> Self {
        Self {
            name: edge.name.clone(),
            owner: edge.owner.name.clone(),
            kind: edge.owner.kind.to_string(),
            tier0: edge.tier0.clone(),
            bandwidth: edge.bandwidth,
            public_ips: edge.services.public_ips.len(),
            services: output::flag(edge.services.service.is_some(), color),
        }
    }
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Type")]
    network_type: String,
}

impl From<&EdgeNetwork> for NetworkRow {
    fn from(n: &EdgeNetwork) -> Self {
        Self {
            name: n.name.clone(),
            cidr: util::or_dash(n.cidr.as_deref()).to_owned(),
            network_type: util::or_dash(n.network_type.as_deref()).to_owned(),
        }
    }
}

fn edge_detail(edge: &EdgeGateway) -> String {
    [
        format!("ID:          {}", edge.id),
        format!("Name:        {}", edge.name),
        format!("Description: {}", util::or_dash(edge.description.as_deref())),
        format!("Owner:       {} ({})", edge.owner.name, edge.owner.kind),
        format!("Tier-0:      {}", edge.tier0),
        format!("Bandwidth:   {} Mbps", edge.bandwidth),
        format!("Status:      {}", util::or_dash(edge.status.as_deref())),
        services_detail(&edge.services),
    ]
    .join("\n")
}

fn services_detail(services: &EdgeServices) -> String {
    let mut lines = Vec::new();
    match &services.load_balancer {
        Some(lb) => lines.push(format!(
            "Load balancer: {} (max {} virtual services)",
            lb.class_of_service, lb.max_virtual_services
        )),
        None => lines.push("Load balancer: -".into()),
    }
    if services.public_ips.is_empty() {
        lines.push("Public IPs:    -".into());
    } else {
        lines.push("Public IPs:".into());
        for ip in &services.public_ips {
            let announced = if ip.announced { " (announced)" } else { "" };
            lines.push(format!("  - {}{announced}", ip.ip));
        }
    }
    match &services.service {
        Some(cav) => {
            lines.push(format!(
                "Services:      {} via {}",
                cav.network, cav.dedicated_ip_for_service
            ));
            for category in cav.catalog {
                lines.push(format!("  - {}:", category.category));
                for endpoint in category.endpoints {
                    lines.push(format!(
                        "      {} {} ({})",
                        endpoint.name,
                        endpoint.ips.join(", "),
                        endpoint.port_list()
                    ));
                }
            }
        }
        None => lines.push("Services:      -".into()),
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(client: &Client, args: EdgeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        EdgeCommand::List => {
            let edges = client.edges().list().await?;
            let out = output::render_list(
                &global.output,
                &edges,
                |e| EdgeRow::new(e, color),
                |e| e.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EdgeCommand::Get { edge } => {
            let edge = client.edges().get(&edge).await?;
            let out = output::render_single(&global.output, &edge, edge_detail, |e| e.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EdgeCommand::Create {
            owner,
            owner_kind,
            tier0,
            bandwidth,
        } => {
            let request = EdgeCreateRequest {
                owner,
                owner_kind: owner_kind.map(|kind| match kind {
                    OwnerKindArg::Vdc => OwnerKind::Vdc,
                    OwnerKindArg::VdcGroup => OwnerKind::VdcGroup,
                }),
                tier0,
                bandwidth,
            };
            output::status("Creating edge gateway...", global.quiet);
            let edge = client.edges().create(request).await?;
            let out = output::render_single(&global.output, &edge, edge_detail, |e| e.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EdgeCommand::Delete { edge } => {
            if !util::confirm(&format!("Delete edge gateway {edge}?"), "edge delete", global.yes)? {
                return Ok(());
            }
            client.edges().delete(&edge).await?;
            output::status(&format!("Edge gateway {edge} deleted"), global.quiet);
            Ok(())
        }

        EdgeCommand::Bandwidth { edge, mbps } => {
            let mut edge = client.edges().get(&edge).await?;
            edge.update_bandwidth(mbps).await?;
            output::status(
                &format!("Edge gateway {} now at {mbps} Mbps", edge.name),
                global.quiet,
            );
            Ok(())
        }

        EdgeCommand::Services { edge } => {
            let edge = client.edges().get(&edge).await?;
            let out = output::render_single(
                &global.output,
                &edge.services,
                services_detail,
                |s| {
                    s.public_ips
                        .iter()
                        .map(|ip| ip.ip.clone())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EdgeCommand::Networks { edge } => {
            let edge = client.edges().get(&edge).await?;
            let networks = edge.networks().await?;
            let out = output::render_list(
                &global.output,
                &networks,
                |n| NetworkRow::from(n),
                |n| n.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EdgeCommand::EnableServices { edge } => {
            let mut edge = client.edges().get(&edge).await?;
            output::status("Enabling Cloud Avenue services...", global.quiet);
            edge.enable_cloudavenue_services().await?;
            let out = output::render_single(
                &global.output,
                &edge.services,
                services_detail,
                |s| {
                    s.service
                        .as_ref()
                        .map(|cav| cav.network.clone())
                        .unwrap_or_default()
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EdgeCommand::DisableServices { edge } => {
            if !util::confirm(
                &format!("Disable Cloud Avenue services on {edge}?"),
                "edge disable-services",
                global.yes,
            )? {
                return Ok(());
            }
            let mut edge = client.edges().get(&edge).await?;
            edge.disable_cloudavenue_services().await?;
            output::status(
                &format!("Cloud Avenue services disabled on {}", edge.name),
                global.quiet,
            );
            Ok(())
        }
    }
}
