pub mod animation_repository;
pub mod did_animation_repository;
pub mod elevenlabs_tts_repository;
pub mod lip_sync_repository;
pub mod tts_repository;
pub mod wav2lip_repository;

pub use animation_repository::AnimationRepository;
pub use did_animation_repository::DidAnimationRepository;
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use lip_sync_repository::LipSyncRepository;
pub use tts_repository::TtsRepository;
pub use wav2lip_repository::Wav2LipRepository;
