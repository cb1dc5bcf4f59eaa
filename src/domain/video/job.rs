use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed rendering configuration sent with every job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    pub fluent: bool,
    pub align_driver: bool,
}

/// Body of the job creation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateJobRequest {
    pub image_url: String,
    pub audio_url: String,
    pub driver_url: String,
    pub config: RenderConfig,
}

impl CreateJobRequest {
    pub fn new(image_ref: &str, audio_ref: &str) -> Self {
        Self {
            image_url: image_ref.to_string(),
            audio_url: audio_ref.to_string(),
            driver_url: "default".to_string(),
            config: RenderConfig {
                fluent: true,
                align_driver: true,
            },
        }
    }
}

/// Accepted creation response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedJob {
    pub id: Option<String>,
}

impl CreatedJob {
    pub fn job_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Raw status response, exactly as the provider reports it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSnapshot {
    pub status: Option<String>,
    pub result_url: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<serde_json::Value>,
}

/// Classified job state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    InProgress,
    Done(String),
    Failed(String),
}

impl JobSnapshot {
    pub fn state(&self) -> JobState {
        match self.status.as_deref() {
            Some("done") => match self.result_location() {
                Some(location) => JobState::Done(location),
                None => {
                    tracing::warn!("Video job reported done without a result location");
                    JobState::InProgress
                }
            },
            Some("failed") => JobState::Failed(self.failure_reason()),
            _ => JobState::InProgress,
        }
    }

    /// First non-empty of `result_url`, then `video_url`
    pub fn result_location(&self) -> Option<String> {
        [&self.result_url, &self.video_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim())
            .find(|url| !url.is_empty())
            .map(str::to_string)
    }

    fn failure_reason(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(serde_json::Value::Object(fields)) => fields
                .get("description")
                .or_else(|| fields.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| serde_json::Value::Object(fields.clone()).to_string()),
            _ => "provider reported failure".to_string(),
        }
    }
}

/// Bounds of the status polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 20,
        }
    }
}
