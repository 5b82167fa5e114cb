// Cloud Avenue HTTP client
//
// Wraps `reqwest::Client` with bearer-token session handling, templated path
// interpolation, version negotiation, vendor error decoding, and cooperative
// cancellation. Endpoint families (InfraAPI jobs/edges/network, OpenAPI
// gateways/firewall/IAM...) are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{ACCEPT, LOCATION};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{Session, TokenProvider};
use crate::error::Error;
use crate::openapi::models::{Page, TaskRef};
use crate::transport::TransportConfig;

/// Default vCloud Director API version negotiated on every request.
pub const DEFAULT_API_VERSION: &str = "37.2";

const PAGE_SIZE: u32 = 128;

// ── Error response shape ─────────────────────────────────────────────

/// Vendor error payload. InfraAPI answers `{code, reason, message}`,
/// OpenAPI answers `{majorErrorCode, minorErrorCode, message}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default, alias = "majorErrorCode")]
    code: Option<serde_json::Value>,
    #[serde(default, alias = "minorErrorCode")]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Replace every `{name}` token of `template` with its value from `params`.
///
/// Unknown tokens are left untouched so that a missing parameter shows up
/// verbatim in the request path (and in the resulting 404).
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_owned(), |path, (key, value)| {
        path.replace(&format!("{{{key}}}"), value)
    })
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one Cloud Avenue console.
///
/// Cheaply cloneable: the HTTP pool and the session are shared. A clone made
/// with [`with_cancellation`](Self::with_cancellation) aborts its in-flight
/// requests when the given token fires.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_version: Arc<str>,
    session: Arc<Session>,
    cancel: CancellationToken,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a transport config and a token provider.
    pub fn new(
        base_url: Url,
        api_version: &str,
        provider: Arc<dyn TokenProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, api_version, provider))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        api_version: &str,
        provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            http,
            base_url,
            api_version: Arc::from(api_version),
            session: Arc::new(Session::new(provider)),
            cancel: CancellationToken::new(),
        }
    }

    /// A clone of this client whose requests race `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    // ── URL builder ──────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn accept(&self, path: &str) -> String {
        // The legacy `/api/` task endpoint only negotiates the vendor wildcard type.
        if path.starts_with("/api/task/") {
            format!("application/*+json;version={}", self.api_version)
        } else {
            format!("application/json;version={}", self.api_version)
        }
    }

    // ── Request execution ────────────────────────────────────────────

    /// Race a future against the client's cancellation token.
    pub(crate) async fn cancellable<F, T>(&self, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            res = fut => res,
        }
    }

    /// Send one request with the session bearer, re-opening the session once
    /// if the token is rejected.
    async fn execute<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;

        for attempt in 0..2 {
            let token = self
                .cancellable(self.session.bearer(&self.http, &self.base_url, &self.api_version))
                .await?;

            let mut req = self
                .http
                .request(method.clone(), url.clone())
                .header(ACCEPT, self.accept(path))
                .bearer_auth(token.expose_secret());
            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            debug!("{method} {url}");
            let resp = self
                .cancellable(async { req.send().await.map_err(Error::Transport) })
                .await?;

            if resp.status() == StatusCode::UNAUTHORIZED && attempt == 0 {
                debug!("bearer rejected, opening a new session");
                self.session.invalidate().await;
                continue;
            }
            return Ok(resp);
        }

        Err(Error::SessionExpired)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_with_params(path, &[]).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let resp = self
            .execute::<()>(Method::GET, path, params, None)
            .await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.post_with_params(path, &[], body).await
    }

    pub(crate) async fn post_with_params<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        params: &[(&str, String)],
        body: &B,
    ) -> Result<T, Error> {
        let resp = self
            .execute(Method::POST, path, params, Some(body))
            .await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self.execute(Method::PUT, path, &[], Some(body)).await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self
            .execute::<()>(Method::DELETE, path, &[], None)
            .await?;
        self.handle_response(path, resp).await
    }

    // ── vCD task-returning verbs ─────────────────────────────────────
    //
    // OpenAPI mutations answer `202 Accepted` with the task in `Location`.
    // A synchronous `200`/`201`/`204` yields `None`.

    pub(crate) async fn post_task<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<TaskRef>, Error> {
        let resp = self.execute(Method::POST, path, &[], Some(body)).await?;
        self.handle_task(path, resp).await
    }

    pub(crate) async fn put_task<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<TaskRef>, Error> {
        let resp = self.execute(Method::PUT, path, &[], Some(body)).await?;
        self.handle_task(path, resp).await
    }

    pub(crate) async fn delete_task(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<TaskRef>, Error> {
        let resp = self
            .execute::<()>(Method::DELETE, path, params, None)
            .await?;
        self.handle_task(path, resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(path, status, resp).await);
        }

        let body = self
            .cancellable(async { resp.text().await.map_err(Error::Transport) })
            .await?;
        trace!(path, body = %body, "response body");
        let raw: &str = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(raw).map_err(|e| {
            let end = body.char_indices().nth(200).map_or(body.len(), |(i, _)| i);
            let preview = &body[..end];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    async fn handle_task(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<Option<TaskRef>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(path, status, resp).await);
        }

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match location {
            Some(href) => Ok(Some(TaskRef::from_href(&href))),
            None if status == StatusCode::ACCEPTED => Err(Error::MissingReference {
                what: "task location",
                path: path.to_owned(),
            }),
            None => Ok(None),
        }
    }

    async fn parse_error(&self, path: &str, status: StatusCode, resp: reqwest::Response) -> Error {
        if status == StatusCode::UNAUTHORIZED {
            return Error::SessionExpired;
        }

        let raw = resp.text().await.unwrap_or_default();
        let decoded = serde_json::from_str::<ErrorResponse>(&raw).ok();

        let message = decoded
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| if raw.is_empty() { status.to_string() } else { raw.clone() });

        if status == StatusCode::NOT_FOUND {
            return Error::NotFound {
                path: path.to_owned(),
                message,
            };
        }

        let code = decoded
            .as_ref()
            .and_then(|e| e.code.as_ref())
            .map_or_else(
                || status.as_u16().to_string(),
                |v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            );
        let reason = decoded
            .and_then(|e| e.reason)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_owned());

        Error::Api {
            status: status.as_u16(),
            code,
            reason,
            message,
        }
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Collect every page of an OpenAPI collection.
    ///
    /// `filter` is the FIQL expression passed as `filter=` (e.g. `name==edge01`).
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut page_number: u32 = 1;

        loop {
            let mut params = vec![
                ("page", page_number.to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ];
            if let Some(filter) = filter {
                params.push(("filter", filter.to_owned()));
            }

            let page: Page<T> = self.get_with_params(path, &params).await?;
            let page_count = page.page_count;
            all.extend(page.values);

            if page_number >= page_count {
                break;
            }
            page_number += 1;
        }

        Ok(all)
    }
}
