// ── Core error types ──
//
// Caller-facing errors of the Cloud Avenue SDK. Every kind is matchable;
// transport details never leak as raw `reqwest` or JSON errors. The
// `From<cloudavenue_api::Error>` impl translates the HTTP layer, and
// `ApiResultExt::on` wraps server errors once with the failing operation.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    /// Server 404, or a lookup expecting exactly one match found none.
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// A name-scoped lookup matched more than one object.
    #[error("ambiguous {entity} name {name}: {count} matches")]
    Ambiguous {
        entity: String,
        name: String,
        count: usize,
    },

    // ── Local validation ─────────────────────────────────────────────
    #[error("invalid {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("{field} must not be empty")]
    Empty { field: String },

    /// The requested transition does not apply to the current server state.
    #[error("operation rejected: {message}")]
    Rejected { message: String },

    /// The Tier-0 VRF has less headroom than requested.
    #[error("no bandwidth capacity remaining on tier-0 {tier0} ({remaining} Mbps left)")]
    CapacityExhausted { tier0: String, remaining: u32 },

    // ── Jobs ─────────────────────────────────────────────────────────
    #[error("job {job_id} failed: {details}")]
    JobFailed { job_id: String, details: String },

    #[error("timeout after {elapsed_secs} seconds")]
    JobTimeout { elapsed_secs: u64 },

    // ── Transport / server ───────────────────────────────────────────
    #[error("authentication failed: {message}")]
    AuthFailed { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    /// Non-2xx answer carrying the formatted vendor payload.
    #[error("{message}")]
    Server { status: Option<u16>, message: String },

    #[error("operation cancelled")]
    Cancelled,

    // ── Configuration ────────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn empty(field: &str) -> Self {
        Self::Empty {
            field: field.to_owned(),
        }
    }

    pub(crate) fn not_found(entity: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.to_owned(),
            identifier: identifier.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Prefix a server error with the operation it came from.
    fn on(self, operation: &str) -> Self {
        match self {
            Self::Server { status, message } => Self::Server {
                status,
                message: format!("error on {operation}: {message}"),
            },
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cloudavenue_api::Error> for CoreError {
    fn from(err: cloudavenue_api::Error) -> Self {
        use cloudavenue_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthFailed { message },
            Api::SessionExpired => Self::AuthFailed {
                message: "session expired -- re-authentication required".into(),
            },
            Api::Transport(e) => Self::Transport {
                message: e.to_string(),
            },
            Api::Tls(msg) => Self::Transport {
                message: format!("TLS error: {msg}"),
            },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            Api::Cancelled => Self::Cancelled,
            Api::NotFound { path, .. } => Self::NotFound {
                entity: "resource".into(),
                identifier: path,
            },
            err @ Api::Api { status, .. } => Self::Server {
                status: Some(status),
                message: err.to_string(),
            },
            err @ Api::MissingReference { .. } => Self::Server {
                status: None,
                message: err.to_string(),
            },
            Api::Deserialization { message, .. } => Self::Transport {
                message: format!("unexpected response body: {message}"),
            },
        }
    }
}

/// Translate an API result, wrapping server errors with the operation name.
pub(crate) trait ApiResultExt<T> {
    fn on(self, operation: &str) -> Result<T, CoreError>;
}

impl<T> ApiResultExt<T> for Result<T, cloudavenue_api::Error> {
    fn on(self, operation: &str) -> Result<T, CoreError> {
        self.map_err(|e| CoreError::from(e).on(operation))
    }
}
