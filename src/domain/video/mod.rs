pub mod error;
pub mod job;
pub mod local;
pub mod poller;
pub mod remote;

pub use error::{JobError, VideoServiceError};
pub use job::{CreateJobRequest, CreatedJob, JobSnapshot, JobState, PollSettings};
pub use local::LocalVideoRenderer;
pub use poller::submit_and_await;
pub use remote::RemoteVideoRenderer;

use crate::domain::speech::AudioAsset;
use crate::infrastructure::config::VideoBackend;
use async_trait::async_trait;
use std::path::PathBuf;

/// Uploaded face photo
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl ImageAsset {
    /// File extension matching the content type (JPEG unless PNG)
    pub fn extension(&self) -> &'static str {
        if self.content_type == "image/png" {
            "png"
        } else {
            "jpg"
        }
    }
}

/// Kind of asset sent to the animation provider's upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Audio => "audio",
        }
    }
}

/// Where a finished video can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoLocation {
    /// Remote URL issued by the animation provider
    Url(String),
    /// File written by the local lip-sync run
    File(PathBuf),
}

impl std::fmt::Display for VideoLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoLocation::Url(url) => write!(f, "{}", url),
            VideoLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Turns a face photo and narration into a talking-head video.
/// Both backends report through the same result shape.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn render(
        &self,
        image: &ImageAsset,
        audio: &AudioAsset,
    ) -> Result<VideoLocation, VideoServiceError>;

    fn backend(&self) -> VideoBackend;
}
