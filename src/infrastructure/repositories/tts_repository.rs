use crate::domain::speech::{LanguageCode, VoiceSelector};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider.
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Mapping the requested voice to a provider voice
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Arguments
    /// * `text` - The cleaned text to synthesize (no HTML, normalized whitespace)
    /// * `language` - The detected language of the text
    /// * `voice` - Male or female narrator
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
        voice: VoiceSelector,
    ) -> Result<Vec<u8>, String>;
}
