use crate::error::AppError;

/// Ways a remote rendering job can end without a video
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("video job creation failed: {0}")]
    Creation(String),
    #[error("status request for video job {job_id} failed: {reason}")]
    PollTransport { job_id: String, reason: String },
    #[error("video job {job_id} failed: {reason}")]
    Failed { job_id: String, reason: String },
    #[error("video job {job_id} still unfinished after {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum VideoServiceError {
    #[error("asset upload failed: {0}")]
    Upload(String),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error("lip sync failed: {0}")]
    LipSync(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<VideoServiceError> for AppError {
    fn from(err: VideoServiceError) -> Self {
        match err {
            VideoServiceError::Job(JobError::Timeout { .. }) => {
                AppError::ExternalTimeout(err.to_string())
            }
            VideoServiceError::Upload(_)
            | VideoServiceError::Job(_)
            | VideoServiceError::LipSync(_) => AppError::ExternalService(err.to_string()),
            VideoServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
