use async_trait::async_trait;
use std::time::Duration;

/// Result type for scheduler job execution
pub type JobResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A periodic background job managed by the scheduler
#[async_trait]
pub trait SchedulerJob: Send + Sync {
    /// Job name used in log output
    fn name(&self) -> &'static str;

    /// Time between executions
    fn interval(&self) -> Duration;

    /// Run one execution of the job
    async fn execute(&self) -> JobResult;
}
