// ── Network services of an edge ──
//
// The InfraAPI exposes one organization-wide tree:
// `tier-0-vrf → edge-gateway → {load-balancer | service}`. The services of a
// single edge are rebuilt from it on every read; nothing is cached.

use cloudavenue_api::infra::models::NetworkServiceNode;
use serde::Serialize;
use strum::Display;

use crate::validate::ipv4_network_address;

pub(crate) const NODE_TIER0: &str = "tier-0-vrf";
pub(crate) const NODE_EDGE: &str = "edge-gateway";
pub(crate) const NODE_LOAD_BALANCER: &str = "load-balancer";
pub(crate) const NODE_SERVICE: &str = "service";

pub(crate) const SERVICE_INTERNET: &str = "internet";
pub(crate) const SERVICE_CAV: &str = "cav-services";
const SERVICE_CAV_LEGACY: &str = "cav_services";

/// Prefix length of the network allocated for the services zone.
pub(crate) const SERVICE_PREFIX_LENGTH: u8 = 27;

/// Everything attached to one edge gateway in the network service tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdgeServices {
    pub load_balancer: Option<LoadBalancerService>,
    pub public_ips: Vec<PublicIpService>,
    pub service: Option<CloudAvenueServices>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancerService {
    pub class_of_service: String,
    pub max_virtual_services: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicIpService {
    pub id: String,
    pub ip: String,
    pub announced: bool,
}

/// The "Cloud Avenue Services" zone: a dedicated network giving the edge
/// access to the platform's shared services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudAvenueServices {
    pub id: String,
    pub network: String,
    /// Network address of `network`.
    pub dedicated_ip_for_service: String,
    #[serde(skip)]
    pub catalog: &'static [ServiceCategory],
}

/// A family of platform services reachable from the services zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceCategory {
    pub category: &'static str,
    pub description: &'static str,
    pub endpoints: &'static [ServiceEndpoint],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoint {
    pub name: &'static str,
    pub fqdns: &'static [&'static str],
    pub ips: &'static [&'static str],
    pub ports: &'static [(u16, ServiceProtocol)],
}

/// Transport protocol of a catalog port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServiceProtocol {
    Tcp,
    Udp,
}

impl ServiceEndpoint {
    /// Ports as `53/udp, 53/tcp`.
    pub fn port_list(&self) -> String {
        self.ports
            .iter()
            .map(|(port, protocol)| format!("{port}/{protocol}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

use ServiceProtocol::{Tcp, Udp};

/// Well-known services of the platform.
pub static CATALOG: &[ServiceCategory] = &[
    ServiceCategory {
        category: "administration",
        description: "Package repositories and time service",
        endpoints: &[
            ServiceEndpoint {
                name: "linux-repository",
                fqdns: &["repo.service.cav"],
                ips: &["57.199.209.214"],
                ports: &[(80, Tcp), (443, Tcp)],
            },
            ServiceEndpoint {
                name: "windows-repository",
                fqdns: &["wsus.service.cav"],
                ips: &["57.199.209.197"],
                ports: &[(80, Tcp), (443, Tcp)],
            },
            ServiceEndpoint {
                name: "ntp",
                fqdns: &["ntp.service.cav"],
                ips: &["57.199.209.212", "57.199.209.213"],
                ports: &[(123, Udp)],
            },
        ],
    },
    ServiceCategory {
        category: "dns",
        description: "Authoritative and recursive name servers",
        endpoints: &[ServiceEndpoint {
            name: "dns",
            fqdns: &["dns.service.cav"],
            ips: &["57.199.209.207", "57.199.209.208"],
            ports: &[(53, Udp), (53, Tcp)],
        }],
    },
    ServiceCategory {
        category: "smtp",
        description: "Outbound mail relay",
        endpoints: &[ServiceEndpoint {
            name: "smtp",
            fqdns: &["smtp.service.cav"],
            ips: &["57.199.209.206"],
            ports: &[(25, Tcp)],
        }],
    },
    ServiceCategory {
        category: "s3",
        description: "Object storage gateway",
        endpoints: &[ServiceEndpoint {
            name: "s3-gateway",
            fqdns: &["s3-region01.cloudavenue.orange-business.com"],
            ips: &["194.206.55.5", "194.206.55.6"],
            ports: &[(443, Tcp)],
        }],
    },
    ServiceCategory {
        category: "kms",
        description: "Windows key management service",
        endpoints: &[ServiceEndpoint {
            name: "kms",
            fqdns: &["kms.service.cav"],
            ips: &["57.199.209.210"],
            ports: &[(1688, Tcp)],
        }],
    },
];

/// Extract the services of one edge from the organization tree.
///
/// Only the Tier-0 node named `tier0` and, below it, only the edge node whose
/// `edgeUUID` equals `edge_uuid` are considered.
pub fn reconcile(tree: &[NetworkServiceNode], tier0: &str, edge_uuid: &str) -> EdgeServices {
    let mut services = EdgeServices::default();

    let edges = tree
        .iter()
        .filter(|node| node.node_type == NODE_TIER0 && node.name == tier0)
        .flat_map(|node| node.children.iter())
        .filter(|node| {
            node.node_type == NODE_EDGE
                && node
                    .properties
                    .edge_uuid
                    .as_deref()
                    .is_some_and(|uuid| uuid.eq_ignore_ascii_case(edge_uuid))
        });

    for node in edges.flat_map(|edge| edge.children.iter()) {
        match (node.node_type.as_str(), node.name.as_str()) {
            (NODE_LOAD_BALANCER, _) => {
                services.load_balancer = Some(LoadBalancerService {
                    class_of_service: node.properties.class_of_service.clone().unwrap_or_default(),
                    max_virtual_services: node.properties.max_virtual_services.unwrap_or_default(),
                });
            }
            (NODE_SERVICE, SERVICE_INTERNET) => {
                services.public_ips.push(PublicIpService {
                    id: node.service_id.clone().unwrap_or_default(),
                    ip: node.properties.ip.clone().unwrap_or_default(),
                    announced: node.properties.announced.unwrap_or_default(),
                });
            }
            (NODE_SERVICE, SERVICE_CAV | SERVICE_CAV_LEGACY) => {
                let network = node.properties.ranges.first().cloned().unwrap_or_default();
                let dedicated_ip_for_service = ipv4_network_address(&network)
                    .map(|ip| ip.to_string())
                    .unwrap_or_default();
                services.service = Some(CloudAvenueServices {
                    id: node.service_id.clone().unwrap_or_default(),
                    network,
                    dedicated_ip_for_service,
                    catalog: CATALOG,
                });
            }
            _ => {}
        }
    }

    services
}
