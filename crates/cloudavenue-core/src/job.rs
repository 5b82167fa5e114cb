// ── Job tracker ──
//
// InfraAPI mutations answer with a `{jobId, message}` handle; OpenAPI
// mutations answer with a vCD task in `Location`. Both are polled to a
// terminal state by the same state machine: refresh once, then poll every
// `poll_interval` until DONE, a failure, the deadline, or cancellation.

use std::future::Future;
use std::time::Duration;

use cloudavenue_api::infra::models::JobStatusRecord;
use cloudavenue_api::openapi::models::TaskRecord;
use serde::Serialize;
use strum::{Display, EnumString};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Status of an asynchronous job. `Done` is the only successful terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Created,
    Pending,
    InProgress,
    Done,
    Failed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Error)
    }

    /// Map a vCD task status onto the job lifecycle.
    pub fn from_task_status(status: &str) -> Self {
        match status {
            "queued" | "preRunning" => Self::Pending,
            "success" => Self::Done,
            "error" => Self::Error,
            "aborted" => Self::Failed,
            "running" => Self::InProgress,
            other => {
                warn!(status = other, "unknown task status, treating as in progress");
                Self::InProgress
            }
        }
    }

    fn from_job_status(status: &str) -> Self {
        status.parse().unwrap_or_else(|_| {
            warn!(status, "unknown job status, treating as in progress");
            Self::InProgress
        })
    }
}

/// Snapshot of a job or task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Server-supplied description of what went wrong, if anything.
    pub details: String,
}

impl From<JobStatusRecord> for Job {
    fn from(record: JobStatusRecord) -> Self {
        let status = JobStatus::from_job_status(&record.status);
        let details = record
            .actions
            .iter()
            .filter(|action| !action.details.is_empty())
            .map(|action| format!("{}: {}", action.name, action.details))
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            id: record.job_id.unwrap_or_default(),
            status,
            details: if details.is_empty() {
                record.description.unwrap_or_default()
            } else {
                details
            },
        }
    }
}

impl From<TaskRecord> for Job {
    fn from(record: TaskRecord) -> Self {
        let details = record
            .error
            .and_then(|e| e.message)
            .or(record.details)
            .unwrap_or_default();
        Self {
            id: record.id.unwrap_or_default(),
            status: JobStatus::from_task_status(&record.status),
            details,
        }
    }
}

/// Poll cadence and deadline of one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub deadline: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            deadline: Duration::from_secs(15 * 60),
        }
    }
}

/// Drive `refresh` until the job is DONE.
///
/// The first refresh happens immediately. FAILED or ERROR ends the wait
/// with [`CoreError::JobFailed`]; a refresh error is returned as-is and
/// never retried. Exceeding `deadline` yields [`CoreError::JobTimeout`];
/// firing `cancel` yields [`CoreError::Cancelled`].
pub async fn wait_for<F, Fut>(
    cancel: &CancellationToken,
    options: WaitOptions,
    mut refresh: F,
) -> Result<Job, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Job, CoreError>>,
{
    let started = Instant::now();

    loop {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        let job = refresh().await?;
        debug!(job_id = %job.id, status = %job.status, "job refreshed");

        match job.status {
            JobStatus::Done => return Ok(job),
            JobStatus::Failed | JobStatus::Error => {
                return Err(CoreError::JobFailed {
                    job_id: job.id,
                    details: job.details,
                });
            }
            JobStatus::Created | JobStatus::Pending | JobStatus::InProgress => {}
        }

        let elapsed = started.elapsed();
        if elapsed >= options.deadline {
            return Err(CoreError::JobTimeout {
                elapsed_secs: elapsed.as_secs(),
            });
        }

        let nap = options.poll_interval.min(options.deadline - elapsed);
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(CoreError::Cancelled),
            () = tokio::time::sleep(nap) => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn job(status: JobStatus) -> Job {
        Job {
            id: "job-1".into(),
            status,
            details: "edge: allocation failed".into(),
        }
    }

    fn opts(poll: u64, deadline: u64) -> WaitOptions {
        WaitOptions {
            poll_interval: Duration::from_secs(poll),
            deadline: Duration::from_secs(deadline),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn done_on_first_refresh_returns_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = wait_for(&CancellationToken::new(), opts(2, 10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(job(JobStatus::Done)) }
        })
        .await
        .unwrap();
        assert_eq!(result.status, JobStatus::Done);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_done() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = wait_for(&CancellationToken::new(), opts(2, 60), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(job(if n < 3 {
                    JobStatus::InProgress
                } else {
                    JobStatus::Done
                }))
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_stops_polling_with_details() {
        let err = wait_for(&CancellationToken::new(), opts(1, 60), || async {
            Ok(job(JobStatus::Error))
        })
        .await
        .unwrap_err();
        match err {
            CoreError::JobFailed { job_id, details } => {
                assert_eq!(job_id, "job-1");
                assert_eq!(details, "edge: allocation failed");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_yields_timeout_with_elapsed_seconds() {
        let err = wait_for(&CancellationToken::new(), opts(1, 3), || async {
            Ok(job(JobStatus::InProgress))
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "timeout after 3 seconds");
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_error_is_surfaced_without_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let err = wait_for(&CancellationToken::new(), opts(1, 60), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CoreError::Transport {
                    message: "connection reset".into(),
                })
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Transport { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_abandons_the_wait() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });
        let err = wait_for(&cancel, opts(2, 600), || async {
            Ok(job(JobStatus::Pending))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[test]
    fn task_status_mapping() {
        assert_eq!(JobStatus::from_task_status("queued"), JobStatus::Pending);
        assert_eq!(JobStatus::from_task_status("preRunning"), JobStatus::Pending);
        assert_eq!(JobStatus::from_task_status("running"), JobStatus::InProgress);
        assert_eq!(JobStatus::from_task_status("success"), JobStatus::Done);
        assert_eq!(JobStatus::from_task_status("error"), JobStatus::Error);
        assert_eq!(JobStatus::from_task_status("aborted"), JobStatus::Failed);
    }

    #[test]
    fn job_record_conversion_collects_action_details() {
        let record: JobStatusRecord = serde_json::from_value(serde_json::json!({
            "jobId": "job-9",
            "status": "FAILED",
            "description": "create edge",
            "actions": [
                { "name": "reserve", "status": "DONE", "details": "" },
                { "name": "deploy", "status": "FAILED", "details": "no capacity" }
            ]
        }))
        .unwrap();
        let job = Job::from(record);
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.details, "deploy: no capacity");
        assert_eq!(job.id, "job-9");
    }
}
