// ── Typed identifiers ──
//
// Cloud Avenue names every entity with `urn:<realm>:<kind>:<uuidv4>`.
// The functions here recognize, normalize, and strip those prefixes; they
// are pure and never touch the network.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

static UUID_V4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("valid UUIDv4 regex")
});

const REALM_PREFIXES: [&str; 2] = ["urn:vcloud:", "urn:cloudavenue:"];

/// Every entity kind that carries a URN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum UrnKind {
    Organization,
    Vm,
    User,
    Group,
    EdgeGateway,
    Vdc,
    VdcGroup,
    VdcComputePolicy,
    Network,
    LoadBalancerPool,
    VdcStorageProfile,
    VApp,
    VAppTemplate,
    Disk,
    SecurityGroup,
    Catalog,
    Token,
    NetworkContextProfile,
    Vcda,
    AppPortProfile,
    CertificateLibraryItem,
    LoadBalancerVirtualService,
    ServiceEngineGroup,
}

impl UrnKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Organization => "urn:vcloud:org:",
            Self::Vm => "urn:vcloud:vm:",
            Self::User => "urn:vcloud:user:",
            Self::Group => "urn:vcloud:group:",
            Self::EdgeGateway => "urn:vcloud:gateway:",
            Self::Vdc => "urn:vcloud:vdc:",
            Self::VdcGroup => "urn:vcloud:vdcGroup:",
            Self::VdcComputePolicy => "urn:vcloud:vdcComputePolicy:",
            Self::Network => "urn:vcloud:network:",
            Self::LoadBalancerPool => "urn:vcloud:loadBalancerPool:",
            Self::VdcStorageProfile => "urn:vcloud:vdcstorageProfile:",
            Self::VApp => "urn:vcloud:vapp:",
            Self::VAppTemplate => "urn:vcloud:vapptemplate:",
            Self::Disk => "urn:vcloud:disk:",
            Self::SecurityGroup => "urn:vcloud:firewallGroup:",
            Self::Catalog => "urn:vcloud:catalog:",
            Self::Token => "urn:vcloud:token:",
            Self::NetworkContextProfile => "urn:vcloud:networkContextProfile:",
            Self::Vcda => "urn:cloudavenue:vcda:",
            Self::AppPortProfile => "urn:vcloud:applicationPortProfile:",
            Self::CertificateLibraryItem => "urn:vcloud:certificateLibraryItem:",
            Self::LoadBalancerVirtualService => "urn:vcloud:loadBalancerVirtualService:",
            Self::ServiceEngineGroup => "urn:vcloud:serviceEngineGroup:",
        }
    }

    /// Kind whose prefix `urn` starts with, if any.
    pub fn of(urn: &str) -> Option<Self> {
        Self::iter().find(|kind| urn.starts_with(kind.prefix()))
    }
}

/// `true` for the RFC 4122 version-4 textual form `8-4-4-4-12`.
pub fn is_uuid_v4(s: &str) -> bool {
    UUID_V4.is_match(s)
}

/// `true` iff `urn` carries the prefix of `kind` followed by a UUIDv4.
pub fn is_kind(urn: &str, kind: UrnKind) -> bool {
    urn.strip_prefix(kind.prefix()).is_some_and(is_uuid_v4)
}

/// `true` iff `s` is a well-formed URN of any known kind.
pub fn is_urn(s: &str) -> bool {
    UrnKind::of(s).is_some_and(|kind| is_kind(s, kind))
}

/// Strip any known prefix and return the suffix, or `""` when no prefix
/// matches.
pub fn extract_uuid(urn: &str) -> &str {
    UrnKind::of(urn)
        .and_then(|kind| urn.strip_prefix(kind.prefix()))
        .unwrap_or_default()
}

/// Prefix `s` with the URN prefix of `kind`, unless it is already a URN.
pub fn normalize(kind: UrnKind, s: &str) -> String {
    if REALM_PREFIXES.iter().any(|realm| s.starts_with(realm)) {
        s.to_owned()
    } else {
        format!("{}{s}", kind.prefix())
    }
}
