use super::error::VideoServiceError;
use super::{ImageAsset, VideoLocation, VideoRenderer};
use crate::domain::speech::AudioAsset;
use crate::infrastructure::config::VideoBackend;
use crate::infrastructure::repositories::LipSyncRepository;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Renders with the local lip-sync model: stage inputs on disk, then run the process
pub struct LocalVideoRenderer {
    lip_sync_repo: Arc<dyn LipSyncRepository>,
    work_dir: PathBuf,
}

impl LocalVideoRenderer {
    pub fn new(lip_sync_repo: Arc<dyn LipSyncRepository>, work_dir: PathBuf) -> Self {
        Self {
            lip_sync_repo,
            work_dir,
        }
    }
}

#[async_trait]
impl VideoRenderer for LocalVideoRenderer {
    async fn render(
        &self,
        image: &ImageAsset,
        audio: &AudioAsset,
    ) -> Result<VideoLocation, VideoServiceError> {
        let face_path = self
            .work_dir
            .join(format!("input_face.{}", image.extension()));
        let audio_path = self.work_dir.join(&audio.file_name);

        tokio::fs::write(&face_path, &image.bytes)
            .await
            .with_context(|| format!("writing face image to {}", face_path.display()))?;
        tokio::fs::write(&audio_path, &audio.bytes)
            .await
            .with_context(|| format!("writing audio to {}", audio_path.display()))?;

        tracing::info!(
            face = %face_path.display(),
            audio = %audio_path.display(),
            "Running local lip sync"
        );

        let output = self
            .lip_sync_repo
            .run(&face_path, &audio_path)
            .await
            .map_err(VideoServiceError::LipSync)?;

        Ok(VideoLocation::File(output))
    }

    fn backend(&self) -> VideoBackend {
        VideoBackend::Wav2Lip
    }
}
