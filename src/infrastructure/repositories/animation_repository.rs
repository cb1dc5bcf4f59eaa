use crate::domain::video::{AssetKind, CreateJobRequest, CreatedJob, JobSnapshot};
use async_trait::async_trait;

/// Repository for a remote talking-head animation provider.
///
/// Every call is a single request: implementations never retry, and report
/// any transport failure or non-success status as `Err`.
#[async_trait]
pub trait AnimationRepository: Send + Sync {
    /// Upload raw bytes and return the provider's opaque reference to them
    async fn upload(
        &self,
        kind: AssetKind,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String>;

    /// Submit a rendering job
    async fn create_job(&self, request: &CreateJobRequest) -> Result<CreatedJob, String>;

    /// Read the current state of a job
    async fn job_status(&self, job_id: &str) -> Result<JobSnapshot, String>;
}
