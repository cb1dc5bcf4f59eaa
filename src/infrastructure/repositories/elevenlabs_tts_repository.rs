use super::tts_repository::TtsRepository;
use crate::domain::speech::text::split_into_batches;
use crate::domain::speech::{LanguageCode, VoiceSelector};
use async_trait::async_trait;
use serde::Serialize;

/// ElevenLabs rejects requests above 5000 characters
const MAX_BATCH_SIZE: usize = 5000;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
    male_voice_id: String,
    female_voice_id: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        base_url: String,
        api_key: String,
        model_id: String,
        male_voice_id: String,
        female_voice_id: String,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model_id,
            male_voice_id,
            female_voice_id,
        }
    }

    fn voice_id(&self, voice: VoiceSelector) -> &str {
        match voice {
            VoiceSelector::Male => &self.male_voice_id,
            VoiceSelector::Female => &self.female_voice_id,
        }
    }

    /// Call ElevenLabs to synthesize a single text batch
    async fn call_elevenlabs(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, String> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(voice_id)
        );

        tracing::info!(
            voice_id = voice_id,
            model = %self.model_id,
            text_length = text.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .http_client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| format!("ElevenLabs TTS request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                voice_id = voice_id,
                "ElevenLabs TTS API call failed"
            );
            return Err(format!("ElevenLabs TTS API error {}: {}", status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read ElevenLabs audio: {}", e))?;

        tracing::debug!(audio_size = bytes.len(), "ElevenLabs audio received");

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
        voice: VoiceSelector,
    ) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_id = self.voice_id(voice);

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            language = %language,
            voice = %voice,
            batch_count = batches.len(),
            text_length = text.len(),
            "Starting ElevenLabs synthesis"
        );

        // MP3 frames concatenate into a playable stream
        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_elevenlabs(batch, voice_id).await?;
            merged_audio.extend(audio);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = "elevenlabs",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}
