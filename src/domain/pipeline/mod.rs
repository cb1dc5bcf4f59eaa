pub mod error;
pub mod service;

pub use error::PipelineError;
pub use service::{GeneratedVideo, NewsVideoService};

use crate::domain::speech::VoiceSelector;
use crate::domain::video::ImageAsset;

/// One user submission of the form
#[derive(Debug, Clone)]
pub struct GenerateVideoCommand {
    pub text: String,
    pub face: ImageAsset,
    pub voice: VoiceSelector,
}
