// vCD task endpoint

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::models::TaskRecord;

const TASK: &str = "/api/task/{taskId}";

impl ApiClient {
    /// `GET /api/task/{taskId}`
    pub async fn get_task(&self, task_id: &str) -> Result<TaskRecord, Error> {
        debug!(task_id, "refreshing task");
        let mut task: TaskRecord = self.get(&interpolate(TASK, &[("taskId", task_id)])).await?;
        if task.id.is_none() {
            task.id = Some(task_id.to_owned());
        }
        Ok(task)
    }
}
