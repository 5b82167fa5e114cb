// Session authentication
//
// The vCloud Director session endpoint hands out a bearer token in the
// `X-VMWARE-VCLOUD-ACCESS-TOKEN` header together with an idle timeout.
// `Session` caches the token with its absolute expiry and refreshes it lazily
// under exclusive access; every request asks it for a valid bearer.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use url::Url;

use crate::error::Error;

const SESSIONS_PATH: &str = "/cloudapi/1.0.0/sessions";
const ACCESS_TOKEN_HEADER: &str = "X-VMWARE-VCLOUD-ACCESS-TOKEN";

/// Username / password / organization triple for a tenant session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub organization: String,
}

/// A bearer token and the instant after which it must be refreshed.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// `expires_at == None` means the token never expires client-side.
    pub fn new(token: SecretString, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    pub fn secret(&self) -> &SecretString {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}

/// Source of bearer tokens.
///
/// Token acquisition is pluggable so that callers can inject a pre-issued
/// API token, or tests can bypass the session endpoint entirely.
pub trait TokenProvider: Send + Sync {
    fn fetch_token<'a>(
        &'a self,
        http: &'a reqwest::Client,
        base_url: &'a Url,
        api_version: &'a str,
    ) -> BoxFuture<'a, Result<AccessToken, Error>>;
}

// ── Session provider ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    #[serde(default)]
    session_idle_timeout_minutes: Option<i64>,
}

/// Opens a vCloud Director session with HTTP Basic `user@org:password`.
pub struct SessionTokenProvider {
    credentials: Credentials,
}

impl SessionTokenProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl TokenProvider for SessionTokenProvider {
    fn fetch_token<'a>(
        &'a self,
        http: &'a reqwest::Client,
        base_url: &'a Url,
        api_version: &'a str,
    ) -> BoxFuture<'a, Result<AccessToken, Error>> {
        Box::pin(async move {
            let url = base_url.join(SESSIONS_PATH)?;
            let user = format!(
                "{}@{}",
                self.credentials.username, self.credentials.organization
            );
            debug!(%url, user, "opening session");

            let resp = http
                .post(url)
                .header(
                    reqwest::header::ACCEPT,
                    format!("application/json;version={api_version}"),
                )
                .basic_auth(user, Some(self.credentials.password.expose_secret()))
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::Authentication {
                    message: format!("session request failed (HTTP {status}): {body}"),
                });
            }

            let token = resp
                .headers()
                .get(ACCESS_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or_else(|| Error::Authentication {
                    message: format!("response carries no {ACCESS_TOKEN_HEADER} header"),
                })?;

            let body = resp.text().await?;
            let expires_at = serde_json::from_str::<SessionResponse>(&body)
                .ok()
                .and_then(|s| s.session_idle_timeout_minutes)
                .map(session_expiry);

            debug!(?expires_at, "session opened");
            Ok(AccessToken::new(SecretString::from(token), expires_at))
        })
    }
}

/// Idle timeouts the server reports outside chrono's range saturate.
fn session_expiry(minutes: i64) -> DateTime<Utc> {
    let idle = TimeDelta::try_minutes(minutes).unwrap_or(TimeDelta::MAX);
    Utc::now()
        .checked_add_signed(idle)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ── Static provider ─────────────────────────────────────────────────

/// Hands out a fixed, never-expiring token.
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn fetch_token<'a>(
        &'a self,
        _http: &'a reqwest::Client,
        _base_url: &'a Url,
        _api_version: &'a str,
    ) -> BoxFuture<'a, Result<AccessToken, Error>> {
        let token = AccessToken::new(self.token.clone(), None);
        Box::pin(async move { Ok(token) })
    }
}

// ── Session state ───────────────────────────────────────────────────

/// Process-wide token cache for one set of credentials.
///
/// Reads take the shared lock; a refresh serializes on `refresh_lock` and
/// re-checks the cache so that concurrent requests open a single session.
pub struct Session {
    provider: Arc<dyn TokenProvider>,
    current: RwLock<Option<AccessToken>>,
    refresh_lock: Mutex<()>,
}

impl Session {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Return a valid bearer token, opening a new session when the cached
    /// one is absent or expired.
    pub async fn bearer(
        &self,
        http: &reqwest::Client,
        base_url: &Url,
        api_version: &str,
    ) -> Result<SecretString, Error> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let fresh = self.provider.fetch_token(http, base_url, api_version).await?;
        let secret = fresh.secret().clone();
        *self.current.write().await = Some(fresh);
        Ok(secret)
    }

    /// Drop the cached token; the next request opens a new session.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    /// Expiry of the cached token, if one is held.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.current
            .read()
            .await
            .as_ref()
            .and_then(AccessToken::expires_at)
    }

    async fn cached(&self) -> Option<SecretString> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|t| !t.is_expired())
            .map(|t| t.secret().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_without_expiry_never_expires() {
        let token = AccessToken::new(SecretString::from("t".to_owned()), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn token_in_the_past_is_expired() {
        let token = AccessToken::new(
            SecretString::from("t".to_owned()),
            Some(Utc::now() - TimeDelta::minutes(1)),
        );
        assert!(token.is_expired());
    }

    #[test]
    fn oversized_idle_timeout_saturates() {
        let expiry = session_expiry(i64::MAX);
        assert_eq!(expiry, DateTime::<Utc>::MAX_UTC);

        let token = AccessToken::new(SecretString::from("t".to_owned()), Some(expiry));
        assert!(!token.is_expired());
    }

    #[test]
    fn idle_timeout_is_counted_from_now() {
        let expiry = session_expiry(30);
        let left = expiry - Utc::now();
        assert!(left > TimeDelta::minutes(29) && left <= TimeDelta::minutes(30));
    }
}
