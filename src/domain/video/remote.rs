use super::error::VideoServiceError;
use super::job::PollSettings;
use super::poller::submit_and_await;
use super::{AssetKind, ImageAsset, VideoLocation, VideoRenderer};
use crate::domain::speech::AudioAsset;
use crate::infrastructure::config::VideoBackend;
use crate::infrastructure::repositories::AnimationRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Renders through the remote animation provider: upload both assets, then wait on the job
pub struct RemoteVideoRenderer {
    animation_repo: Arc<dyn AnimationRepository>,
    poll: PollSettings,
}

impl RemoteVideoRenderer {
    pub fn new(animation_repo: Arc<dyn AnimationRepository>, poll: PollSettings) -> Self {
        Self {
            animation_repo,
            poll,
        }
    }

    async fn upload(
        &self,
        kind: AssetKind,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, VideoServiceError> {
        let reference = self
            .animation_repo
            .upload(kind, file_name, content_type, bytes.to_vec())
            .await
            .map_err(VideoServiceError::Upload)?;

        tracing::info!(kind = kind.as_str(), size = bytes.len(), "Asset uploaded");

        Ok(reference)
    }
}

#[async_trait]
impl VideoRenderer for RemoteVideoRenderer {
    async fn render(
        &self,
        image: &ImageAsset,
        audio: &AudioAsset,
    ) -> Result<VideoLocation, VideoServiceError> {
        let image_ref = self
            .upload(
                AssetKind::Image,
                &image.file_name,
                &image.content_type,
                &image.bytes,
            )
            .await?;
        let audio_ref = self
            .upload(
                AssetKind::Audio,
                &audio.file_name,
                &audio.content_type,
                &audio.bytes,
            )
            .await?;

        let location = submit_and_await(
            self.animation_repo.as_ref(),
            &image_ref,
            &audio_ref,
            self.poll.interval,
            self.poll.max_attempts,
        )
        .await?;

        Ok(location)
    }

    fn backend(&self) -> VideoBackend {
        VideoBackend::Did
    }
}
