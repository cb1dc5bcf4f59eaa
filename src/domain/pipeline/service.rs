use super::{GenerateVideoCommand, PipelineError};
use crate::domain::speech::{LanguageCode, SpeechServiceApi};
use crate::domain::video::{VideoLocation, VideoRenderer};
use crate::infrastructure::config::VideoBackend;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub language: LanguageCode,
    pub location: VideoLocation,
    pub backend: VideoBackend,
    pub char_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Text → speech → talking-head video, one request at a time
pub struct NewsVideoService {
    speech_service: Arc<dyn SpeechServiceApi>,
    renderer: Arc<dyn VideoRenderer>,
    in_flight: Mutex<()>,
}

impl NewsVideoService {
    pub fn new(speech_service: Arc<dyn SpeechServiceApi>, renderer: Arc<dyn VideoRenderer>) -> Self {
        Self {
            speech_service,
            renderer,
            in_flight: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> VideoBackend {
        self.renderer.backend()
    }

    pub async fn generate(
        &self,
        command: GenerateVideoCommand,
    ) -> Result<GeneratedVideo, PipelineError> {
        // Queued requests wait here; the local backend writes fixed paths
        let _guard = self.in_flight.lock().await;
        let start_time = std::time::Instant::now();

        tracing::info!(
            text_length = command.text.len(),
            image_size = command.face.bytes.len(),
            voice = %command.voice,
            backend = self.backend().as_str(),
            "Video generation started"
        );

        let speech = self
            .speech_service
            .synthesize(&command.text, command.voice)
            .await?;

        let location = self.renderer.render(&command.face, &speech.audio).await?;

        tracing::info!(
            language = %speech.language_detected,
            location = %location,
            latency_ms = start_time.elapsed().as_millis(),
            "Video generation completed"
        );

        Ok(GeneratedVideo {
            language: speech.language_detected,
            location,
            backend: self.backend(),
            char_count: speech.char_count,
            generated_at: Utc::now(),
        })
    }
}
