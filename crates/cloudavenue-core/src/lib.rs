//! Domain layer of the Cloud Avenue SDK, on top of `cloudavenue-api`.
//!
//! - **[`Client`]**: Facade bound to one organization. Built from a
//!   [`ClientConfig`]; validates the organization against the compiled-in
//!   console table and derives the endpoint from it. Cheap to clone; clones
//!   share the HTTP pool and the session.
//!
//! - **Edge gateways** ([`edge`]): [`EdgeRegistry`] reconciles the OpenAPI
//!   and InfraAPI views of an edge into one [`EdgeGateway`], checks bandwidth
//!   against the Tier-0 class ladder and capacity, and rebuilds the edge's
//!   network services (public IPs, load balancer, Cloud Avenue services zone)
//!   on every read.
//!
//! - **Firewalls** ([`firewall`]): Rule engine shared by the edge firewall
//!   and the VDC group distributed firewall: priority-prefixed names, stable
//!   `(priority, name)` ordering, hash-based correlation on update. Security
//!   groups, IP sets, dynamic security groups, application port profiles.
//!
//! - **Jobs** ([`job`]): InfraAPI jobs and vCD tasks driven to a terminal
//!   state by one cancellable poll loop.
//!
//! - **IAM, certificates, VCDA** ([`iam`], [`certificates`], [`vcda`]).
//!
//! - **URNs** ([`urn`]): Typed identifiers `urn:<realm>:<kind>:<uuid>`.

pub mod certificates;
pub mod client;
pub mod config;
pub mod console;
pub mod edge;
pub mod error;
pub mod firewall;
pub mod iam;
pub mod job;
pub mod urn;
pub mod validate;
pub mod vcda;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::Client;
pub use config::{AuthCredentials, ClientConfig, TlsVerification};
pub use console::{Console, ConsoleId};
pub use error::CoreError;
pub use job::{Job, JobStatus, WaitOptions};
pub use urn::UrnKind;

pub use certificates::{Certificate, CertificateLibrary, NewCertificate};
pub use edge::{
    EdgeCreateRequest, EdgeGateway, EdgeNetwork, EdgeRegistry, EdgeServices, OwnerKind, OwnerRef,
    PublicIp, Tier0, Tier0Capacity, Tier0Class,
};
pub use firewall::{
    AppPortProfile, DfwState, DistributedFirewall, DynamicSecurityGroup, EdgeFirewall,
    FirewallGroup, FirewallGroups, FirewallRule, IpProtocol, IpSet, RuleAction, RuleDirection,
    SecurityGroup,
};
pub use iam::{NewUser, User, UserSpec, Users};
pub use vcda::Vcda;

// Downstream crates hold secrets without depending on `secrecy` themselves.
pub use secrecy::{ExposeSecret, SecretString};
