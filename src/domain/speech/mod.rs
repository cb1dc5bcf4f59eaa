pub mod error;
pub mod language;
pub mod service;
pub mod text;

pub use error::SpeechServiceError;
pub use language::LanguageCode;
pub use service::{SpeechService, SpeechServiceApi, SpeechSynthesisResult};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Voice chosen on the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceSelector {
    #[default]
    Male,
    Female,
}

impl VoiceSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceSelector::Male => "male",
            VoiceSelector::Female => "female",
        }
    }
}

impl FromStr for VoiceSelector {
    type Err = SpeechServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(VoiceSelector::Male),
            "female" => Ok(VoiceSelector::Female),
            other => Err(SpeechServiceError::Invalid(format!(
                "Unknown voice '{}', expected 'male' or 'female'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for VoiceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synthesized speech handed to the video stage
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl AudioAsset {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "news_audio.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
        }
    }
}
