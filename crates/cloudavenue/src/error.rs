//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cloudavenue_config::ConfigError;
use cloudavenue_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CAPACITY: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("{field} is not configured")]
    #[diagnostic(
        code(cav::missing_setting),
        help("Set {env}, pass --{field}, or add `{field}` to the config file.\nRun: cav config path")
    )]
    MissingSetting { field: String, env: String },

    #[error("no password found for {username}@{org}")]
    #[diagnostic(
        code(cav::no_credentials),
        help("Store one with: cav config set-password\nOr set CLOUDAVENUE_PASSWORD.")
    )]
    NoCredentials { org: String, username: String },

    #[error(transparent)]
    #[diagnostic(code(cav::config))]
    Config(ConfigError),

    // ── Connection / auth ────────────────────────────────────────────
    #[error("authentication failed: {message}")]
    #[diagnostic(
        code(cav::auth_failed),
        help("Check the username, organization and password.\nRun: cav config show")
    )]
    AuthFailed { message: String },

    #[error("could not reach the console: {message}")]
    #[diagnostic(
        code(cav::connection_failed),
        help("Check CLOUDAVENUE_ENDPOINT, or use --insecure for a lab console.")
    )]
    Connection { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{entity} '{identifier}' not found")]
    #[diagnostic(code(cav::not_found))]
    NotFound { entity: String, identifier: String },

    #[error("{count} {entity}s are named '{name}'")]
    #[diagnostic(code(cav::ambiguous), help("Use the URN instead of the name."))]
    Ambiguous {
        entity: String,
        name: String,
        count: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cav::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(cav::rejected))]
    Rejected { message: String },

    #[error("tier-0 {tier0} has only {remaining} Mbps left")]
    #[diagnostic(
        code(cav::capacity),
        help("Run: cav t0 capacity {tier0}")
    )]
    CapacityExhausted { tier0: String, remaining: u32 },

    // ── Jobs ─────────────────────────────────────────────────────────
    #[error("job {job_id} failed: {details}")]
    #[diagnostic(code(cav::job_failed))]
    JobFailed { job_id: String, details: String },

    #[error("timeout after {seconds} seconds")]
    #[diagnostic(
        code(cav::timeout),
        help("The operation may still complete server-side. Raise CLOUDAVENUE_JOB_TIMEOUT to wait longer.")
    )]
    Timeout { seconds: u64 },

    #[error("{message}")]
    #[diagnostic(code(cav::api_error))]
    Api { message: String },

    #[error("operation cancelled")]
    #[diagnostic(code(cav::cancelled))]
    Cancelled,

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cav::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingSetting { .. }
            | Self::Validation { .. }
            | Self::Ambiguous { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::NoCredentials { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::CapacityExhausted { .. } => exit_code::CAPACITY,
            Self::Connection { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, identifier } => Self::NotFound { entity, identifier },
            CoreError::Ambiguous {
                entity,
                name,
                count,
            } => Self::Ambiguous {
                entity,
                name,
                count,
            },
            CoreError::InvalidFormat { field, message } => Self::Validation {
                field,
                reason: message,
            },
            err @ CoreError::Empty { .. } => Self::Validation {
                field: "input".into(),
                reason: err.to_string(),
            },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::CapacityExhausted { tier0, remaining } => {
                Self::CapacityExhausted { tier0, remaining }
            }
            CoreError::JobFailed { job_id, details } => Self::JobFailed { job_id, details },
            CoreError::JobTimeout { elapsed_secs } => Self::Timeout {
                seconds: elapsed_secs,
            },
            CoreError::AuthFailed { message } => Self::AuthFailed { message },
            CoreError::Transport { message } => Self::Connection { message },
            CoreError::Server { message, .. } => Self::Api { message },
            CoreError::Cancelled => Self::Cancelled,
            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { field, env } => Self::MissingSetting {
                field: field.into(),
                env: env.into(),
            },
            ConfigError::NoCredentials { org, username } => Self::NoCredentials { org, username },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
