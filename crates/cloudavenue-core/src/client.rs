// ── Client facade ──
//
// Entry point of the SDK. A `Client` owns one `ApiClient` (HTTP pool plus
// session) and the configuration it was built from, and vends the domain
// registries: edge gateways, Tier-0 VRFs, public IPs, firewalls, IAM,
// certificates, VCDA. It is cheap to clone; clones share the session.

use std::sync::Arc;

use cloudavenue_api::infra::models::JobHandle;
use cloudavenue_api::openapi::models::TaskRef;
use cloudavenue_api::{
    ApiClient, Credentials, SessionTokenProvider, StaticTokenProvider, TlsMode, TokenProvider,
    TransportConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::config::{AuthCredentials, ClientConfig, TlsVerification};
use crate::console::{self, Console};
use crate::error::{ApiResultExt, CoreError};
use crate::job::{Job, JobStatus, WaitOptions, wait_for};

/// Session-bound handle on one Cloud Avenue organization.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    api: ApiClient,
}

struct ClientInner {
    config: ClientConfig,
    console: &'static Console,
}

impl Client {
    /// Build a client. No request is sent until the first operation.
    ///
    /// The organization name must belong to a known console; when the
    /// configuration carries no endpoint, the console URL is used.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let console = console::find_by_organization_name(&config.organization)?;

        let endpoint = match &config.endpoint {
            Some(url) => url.clone(),
            None => Url::parse(console.url).map_err(|e| CoreError::Config {
                message: format!("invalid console URL {}: {e}", console.url),
            })?,
        };

        let provider: Arc<dyn TokenProvider> = match &config.auth {
            AuthCredentials::Session { username, password } => {
                if username.is_empty() {
                    return Err(CoreError::empty("username"));
                }
                Arc::new(SessionTokenProvider::new(Credentials {
                    username: username.clone(),
                    password: password.clone(),
                    organization: config.organization.clone(),
                }))
            }
            AuthCredentials::Token(token) => Arc::new(StaticTokenProvider::new(token.clone())),
        };

        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
        };
        let api = ApiClient::new(endpoint, &config.api_version, provider, &transport)?;

        info!(
            organization = %config.organization,
            console = %console.id,
            endpoint = %api.base_url(),
            "client ready"
        );

        Ok(Self {
            inner: Arc::new(ClientInner { config, console }),
            api,
        })
    }

    /// A clone of this client whose requests and job waits abort when
    /// `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            api: self.api.with_cancellation(cancel),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn console(&self) -> &'static Console {
        self.inner.console
    }

    pub fn organization(&self) -> &str {
        &self.inner.config.organization
    }

    /// Raw HTTP layer, for endpoints the domain layer does not wrap.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cancellation(&self) -> &CancellationToken {
        self.api.cancellation()
    }

    pub(crate) fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            poll_interval: self.inner.config.poll_interval,
            deadline: self.inner.config.job_timeout,
        }
    }

    // ── Job plumbing ─────────────────────────────────────────────────

    /// Fetch the current state of an InfraAPI job.
    pub async fn refresh_job(&self, job_id: &str) -> Result<Job, CoreError> {
        let record = self.api.get_job_status(job_id).await.on("refresh job")?;
        Ok(Job::from(record))
    }

    /// Fetch the current state of a vCD task.
    pub async fn refresh_task(&self, task_id: &str) -> Result<Job, CoreError> {
        let record = self.api.get_task(task_id).await.on("refresh task")?;
        Ok(Job::from(record))
    }

    /// Wait for an InfraAPI job with the configured cadence and deadline.
    pub async fn wait_job(&self, handle: &JobHandle) -> Result<Job, CoreError> {
        self.wait_job_with(handle, self.wait_options()).await
    }

    pub async fn wait_job_with(
        &self,
        handle: &JobHandle,
        options: WaitOptions,
    ) -> Result<Job, CoreError> {
        debug!(job_id = %handle.job_id, message = ?handle.message, "waiting for job");
        wait_for(self.cancellation(), options, || self.refresh_job(&handle.job_id)).await
    }

    /// Wait for a vCD task; a synchronous answer (no task) counts as done.
    pub(crate) async fn wait_task(&self, task: Option<TaskRef>) -> Result<Job, CoreError> {
        let Some(task) = task else {
            return Ok(Job {
                id: String::new(),
                status: JobStatus::Done,
                details: String::new(),
            });
        };
        debug!(task_id = %task.id, "waiting for task");
        wait_for(self.cancellation(), self.wait_options(), || {
            self.refresh_task(&task.id)
        })
        .await
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
