// InfraAPI job endpoint

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::infra::models::JobStatusRecord;

const JOB: &str = "/api/customers/v1.0/jobs/{jobId}";

impl ApiClient {
    /// Fetch the current status of an InfraAPI job.
    ///
    /// `GET /api/customers/v1.0/jobs/{jobId}`
    ///
    /// The endpoint answers an array whose first element is authoritative.
    /// The server omits the job id from the body, so it is stamped back on
    /// the returned record.
    pub async fn get_job_status(&self, job_id: &str) -> Result<JobStatusRecord, Error> {
        let path = interpolate(JOB, &[("jobId", job_id)]);
        debug!(job_id, "refreshing job");

        let records: Vec<JobStatusRecord> = self.get(&path).await?;
        let mut record = records
            .into_iter()
            .next()
            .ok_or(Error::MissingReference {
                what: "job status",
                path,
            })?;
        record.job_id = Some(job_id.to_owned());
        Ok(record)
    }
}
