use thiserror::Error;

/// Top-level error type for the `cloudavenue-api` crate.
///
/// Covers every failure mode of the raw HTTP layer: session authentication,
/// transport, vendor error payloads, and decoding. `cloudavenue-core` maps
/// these into caller-facing error kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The session endpoint rejected the credentials or returned non-2xx.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The bearer token was rejected even after a fresh session was opened.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The client's cancellation token fired while a request was in flight.
    #[error("Request cancelled")]
    Cancelled,

    // ── Server ──────────────────────────────────────────────────────
    /// HTTP 404 on any endpoint.
    #[error("Not found: {path}")]
    NotFound { path: String, message: String },

    /// Any other non-2xx answer, decoded from the vendor error shape.
    #[error("{}", format_vendor_error(.code, .reason, .message))]
    Api {
        status: u16,
        code: String,
        reason: String,
        message: String,
    },

    /// A mutation answered without the job or task reference it should carry.
    #[error("Missing {what} in response from {path}")]
    MissingReference { what: &'static str, path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status of a server-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Standard rendering of the vendor error payload `{code, reason, message}`.
///
/// Every server error surfaced by the SDK goes through this function.
pub fn format_vendor_error(code: &str, reason: &str, message: &str) -> String {
    format!("ErrorCode:{code} - ErrorReason:{reason} - ErrorMessage:{message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_error_format() {
        assert_eq!(
            format_vendor_error("404", "NOT_FOUND", "edge missing"),
            "ErrorCode:404 - ErrorReason:NOT_FOUND - ErrorMessage:edge missing"
        );
    }

    #[test]
    fn api_error_display_uses_vendor_format() {
        let err = Error::Api {
            status: 409,
            code: "CONFLICT".into(),
            reason: "duplicate".into(),
            message: "name already used".into(),
        };
        assert_eq!(
            err.to_string(),
            "ErrorCode:CONFLICT - ErrorReason:duplicate - ErrorMessage:name already used"
        );
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_detection() {
        let err = Error::NotFound {
            path: "/api/customers/v2.0/edges/x".into(),
            message: String::new(),
        };
        assert!(err.is_not_found());
    }
}
