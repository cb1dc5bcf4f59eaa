use crate::domain::speech::SpeechServiceError;
use crate::domain::video::VideoServiceError;
use crate::error::AppError;

/// A request ends in exactly one attributable failure
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Speech(#[from] SpeechServiceError),
    #[error(transparent)]
    Video(#[from] VideoServiceError),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Speech(e) => e.into(),
            PipelineError::Video(e) => e.into(),
        }
    }
}
