// ── Runtime client configuration ──
//
// These types describe *how* to reach a Cloud Avenue console. They carry
// credential data and tuning, but never touch disk: `cloudavenue-config`
// (or any other caller) builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to obtain a bearer token.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Open a vCloud Director session as `username@organization`.
    Session {
        username: String,
        password: SecretString,
    },
    /// Pre-issued bearer token.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (lab consoles only).
    DangerAcceptInvalid,
}

/// Configuration for one organization on one console.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Console URL. Derived from the organization name when `None`.
    pub endpoint: Option<Url>,
    /// Organization name, e.g. `cav01ev01ocb0001234`.
    pub organization: String,
    /// Default owner for edge gateway creation.
    pub vdc: Option<String>,
    pub auth: AuthCredentials,
    /// vCloud Director API version sent in `Accept`.
    pub api_version: String,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Interval between two job polls.
    pub poll_interval: Duration,
    /// Deadline applied to every job wait.
    pub job_timeout: Duration,
}

impl ClientConfig {
    pub fn new(organization: impl Into<String>, auth: AuthCredentials) -> Self {
        Self {
            endpoint: None,
            organization: organization.into(),
            vdc: None,
            auth,
            api_version: cloudavenue_api::client::DEFAULT_API_VERSION.to_owned(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(2),
            job_timeout: Duration::from_secs(15 * 60),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_vdc(mut self, vdc: impl Into<String>) -> Self {
        self.vdc = Some(vdc.into());
        self
    }
}
