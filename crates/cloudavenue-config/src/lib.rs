//! Shared configuration for Cloud Avenue tools.
//!
//! Settings are layered with figment: built-in defaults, then the TOML file
//! in the platform config directory, then `CLOUDAVENUE_*` variables, then
//! `S3_*` variables (nested under `s3`). Credentials resolve through env,
//! the system keyring and finally the file, and the result is translated into
//! a `cloudavenue_core::ClientConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cloudavenue_core::{AuthCredentials, ClientConfig, TlsVerification};

pub const ENV_PREFIX: &str = "CLOUDAVENUE_";
pub const S3_ENV_PREFIX: &str = "S3_";
/// Variable pointing at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "CLOUDAVENUE_CONFIG";
pub const PASSWORD_ENV: &str = "CLOUDAVENUE_PASSWORD";
pub const KEYRING_SERVICE: &str = "cloudavenue";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is not configured (set {env} or `{field}` in the config file)")]
    Missing { field: &'static str, env: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password found for {username}@{org}")]
    NoCredentials { org: String, username: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything a Cloud Avenue tool needs to reach one organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Console URL. Derived from the organization when unset.
    pub endpoint: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext, prefer the keyring or the environment).
    pub password: Option<String>,

    /// Organization name, e.g. `cav01ev01ocb0001234`.
    pub org: Option<String>,

    /// Default VDC for edge gateway creation.
    pub vdc: Option<String>,

    #[serde(default)]
    pub debug: bool,

    /// vCloud Director API version.
    #[serde(default = "default_vcd_version")]
    pub vcd_version: String,

    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Job poll interval, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Job deadline, in seconds.
    #[serde(default = "default_job_timeout")]
    pub job_timeout: u64,

    #[serde(default)]
    pub s3: S3Settings,
}

/// Object storage settings. Loaded for consumers; the SDK itself does not
/// use them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct S3Settings {
    /// OSE control plane endpoint.
    pub endpoint: Option<String>,
    /// S3 data plane endpoint.
    pub s3_endpoint: Option<String>,
    pub cav_token: Option<String>,
    pub organization_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            org: None,
            vdc: None,
            debug: false,
            vcd_version: default_vcd_version(),
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            job_timeout: default_job_timeout(),
            s3: S3Settings::default(),
        }
    }
}

fn default_vcd_version() -> String {
    "37.2".into()
}
fn default_timeout() -> u64 {
    60
}
fn default_poll_interval() -> u64 {
    2
}
fn default_job_timeout() -> u64 {
    15 * 60
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `CLOUDAVENUE_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "orange-business", "cloudavenue").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("cloudavenue");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// The provider stack, with `path` as the TOML layer.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
        .merge(Env::prefixed(S3_ENV_PREFIX).map(|key| format!("s3.{key}").into()))
}

impl Settings {
    /// Load from the default config path and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    /// Load from `path` and the environment. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = figment(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("timeout", self.timeout),
            ("poll_interval", self.poll_interval),
            ("job_timeout", self.job_timeout),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: "must be at least 1 second".into(),
                });
            }
        }
        if self.vcd_version.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "vcd_version".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// A copy safe to print: secrets are masked.
    pub fn redacted(&self) -> Self {
        let mask = |s: &Option<String>| s.as_ref().map(|_| REDACTED.to_owned());
        let mut copy = self.clone();
        copy.password = mask(&self.password);
        copy.s3.cav_token = mask(&self.s3.cav_token);
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn organization(&self) -> Result<&str, ConfigError> {
        self.org
            .as_deref()
            .filter(|o| !o.is_empty())
            .ok_or(ConfigError::Missing {
                field: "org",
                env: "CLOUDAVENUE_ORG",
            })
    }

    pub fn user(&self) -> Result<&str, ConfigError> {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing {
                field: "username",
                env: "CLOUDAVENUE_USERNAME",
            })
    }

    // ── Credential resolution ───────────────────────────────────────

    /// Password of `username@org`: `CLOUDAVENUE_PASSWORD`, then the system
    /// keyring, then the config file.
    pub fn resolve_password(&self, org: &str, username: &str) -> Result<SecretString, ConfigError> {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            if !password.is_empty() {
                return Ok(SecretString::from(password));
            }
        }

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(org, username)) {
            if let Ok(password) = entry.get_password() {
                return Ok(SecretString::from(password));
            }
        }

        if let Some(password) = self.password.as_ref().filter(|p| !p.is_empty()) {
            return Ok(SecretString::from(password.clone()));
        }

        Err(ConfigError::NoCredentials {
            org: org.into(),
            username: username.into(),
        })
    }

    /// Build the SDK client configuration.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let org = self.organization()?;
        let username = self.user()?;
        let password = self.resolve_password(org, username)?;

        let mut config = ClientConfig::new(
            org,
            AuthCredentials::Session {
                username: username.to_owned(),
                password,
            },
        );

        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            let url: url::Url = endpoint.parse().map_err(|_| ConfigError::Validation {
                field: "endpoint".into(),
                reason: format!("invalid URL: {endpoint}"),
            })?;
            config = config.with_endpoint(url);
        }
        if let Some(vdc) = self.vdc.as_deref().filter(|v| !v.is_empty()) {
            config = config.with_vdc(vdc);
        }

        config.api_version.clone_from(&self.vcd_version);
        config.tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ca) = &self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        };
        config.timeout = Duration::from_secs(self.timeout);
        config.poll_interval = Duration::from_secs(self.poll_interval);
        config.job_timeout = Duration::from_secs(self.job_timeout);
        Ok(config)
    }
}

fn keyring_user(org: &str, username: &str) -> String {
    format!("{org}/{username}")
}

/// Store the password of `username@org` in the system keyring.
pub fn store_password(org: &str, username: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(org, username))?.set_password(password)?;
    Ok(())
}
