use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("language detection failed: {0}")]
    Detection(String),
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match err {
            SpeechServiceError::Invalid(msg) => AppError::BadRequest(msg),
            SpeechServiceError::Detection(_) => AppError::Unprocessable(err.to_string()),
            SpeechServiceError::Synthesis(_) => AppError::ExternalService(err.to_string()),
            SpeechServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
