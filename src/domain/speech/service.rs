use super::error::SpeechServiceError;
use super::language::{build_detector, LanguageCode};
use super::text::clean_text;
use super::{AudioAsset, VoiceSelector};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use lingua::LanguageDetector;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SpeechSynthesisResult {
    pub audio: AudioAsset,
    pub language_detected: LanguageCode,
    pub char_count: usize,
}

pub struct SpeechService {
    tts_repo: Arc<dyn TtsRepository>,
    language_detector: LanguageDetector,
}

impl SpeechService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>) -> Self {
        Self {
            tts_repo,
            language_detector: build_detector(),
        }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Turn pasted news text into narrated audio
    ///
    /// This operation:
    /// - Cleans the text (HTML, URLs, whitespace)
    /// - Detects its language, aborting when detection fails
    /// - Calls the TTS provider with the selected voice
    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceSelector,
    ) -> Result<SpeechSynthesisResult, SpeechServiceError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceSelector,
    ) -> Result<SpeechSynthesisResult, SpeechServiceError> {
        let cleaned_text = clean_text(text);
        if cleaned_text.is_empty() {
            return Err(SpeechServiceError::Invalid(
                "Text has no readable content".to_string(),
            ));
        }

        tracing::info!(
            original_length = text.len(),
            cleaned_length = cleaned_text.len(),
            "Text cleaned"
        );

        let language = self.detect_language(&cleaned_text)?;

        tracing::info!(
            language_detected = %language,
            voice = %voice,
            "Language detected for speech synthesis"
        );

        let audio_data = self
            .tts_repo
            .synthesize(&cleaned_text, language, voice)
            .await
            .map_err(SpeechServiceError::Synthesis)?;

        if audio_data.is_empty() {
            return Err(SpeechServiceError::Synthesis(
                "TTS provider returned no audio".to_string(),
            ));
        }

        Ok(SpeechSynthesisResult {
            audio: AudioAsset::mp3(audio_data),
            language_detected: language,
            char_count: cleaned_text.chars().count(),
        })
    }
}

impl SpeechService {
    fn detect_language(&self, text: &str) -> Result<LanguageCode, SpeechServiceError> {
        LanguageCode::detect(&self.language_detector, text).ok_or_else(|| {
            tracing::warn!(text_length = text.len(), "Could not detect language");
            SpeechServiceError::Detection("could not determine the language of the text".to_string())
        })
    }
}
