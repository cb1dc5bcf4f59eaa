use newsreader_backend::controllers::{health::HealthState, video::VideoController};
use newsreader_backend::domain::pipeline::NewsVideoService;
use newsreader_backend::domain::speech::SpeechService;
use newsreader_backend::domain::video::{
    LocalVideoRenderer, PollSettings, RemoteVideoRenderer, VideoRenderer,
};
use newsreader_backend::infrastructure::config::{Config, LogFormat, VideoBackend};
use newsreader_backend::infrastructure::http::{build_router, start_http_server};
use newsreader_backend::infrastructure::repositories::{
    DidAnimationRepository, ElevenLabsTtsRepository, LipSyncRepository, Wav2LipRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Both provider keys are checked here, before anything else starts
    let config = Config::from_env()?;

    init_logging(&config);

    tracing::info!(
        backend = config.video_backend.as_str(),
        "Starting News Reader Backend on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
        config.elevenlabs_base_url.clone(),
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_model_id.clone(),
        config.elevenlabs_male_voice_id.clone(),
        config.elevenlabs_female_voice_id.clone(),
    ));

    // 2. Instantiate the video renderer for the configured backend
    let (renderer, lip_sync): (Arc<dyn VideoRenderer>, Option<Arc<dyn LipSyncRepository>>) =
        match config.video_backend {
            VideoBackend::Did => {
                let animation_repo = Arc::new(DidAnimationRepository::new(
                    config.did_base_url.clone(),
                    config.did_api_key.clone(),
                ));
                let poll = PollSettings {
                    interval: config.video_poll_interval,
                    max_attempts: config.video_poll_max_attempts,
                };
                tracing::info!(
                    interval_ms = poll.interval.as_millis(),
                    max_attempts = poll.max_attempts,
                    "Using D-ID remote rendering"
                );
                let renderer: Arc<dyn VideoRenderer> =
                    Arc::new(RemoteVideoRenderer::new(animation_repo, poll));
                (renderer, None)
            }
            VideoBackend::Wav2Lip => {
                let lip_sync: Arc<dyn LipSyncRepository> = Arc::new(Wav2LipRepository::new(
                    config.wav2lip_python.clone(),
                    config.wav2lip_script.clone(),
                    config.wav2lip_checkpoint.clone(),
                    config.wav2lip_fallback_checkpoint.clone(),
                    config.wav2lip_output.clone(),
                    config.work_dir.clone(),
                ));
                if lip_sync.checkpoint().is_none() {
                    tracing::warn!("Wav2Lip checkpoint not found; requests will fail until it is installed");
                }
                let renderer: Arc<dyn VideoRenderer> = Arc::new(LocalVideoRenderer::new(
                    lip_sync.clone(),
                    config.work_dir.clone(),
                ));
                (renderer, Some(lip_sync))
            }
        };

    // 3. Instantiate services
    tracing::info!("Instantiating services...");
    let speech_service = Arc::new(SpeechService::new(tts_repo));
    let news_video_service = Arc::new(NewsVideoService::new(speech_service, renderer));

    // 4. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let video_controller = Arc::new(VideoController::new(news_video_service, config.clone()));
    let health_state = Arc::new(HealthState {
        backend: config.video_backend,
        lip_sync,
    });

    let app = build_router(&config, health_state, video_controller);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "newsreader_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "newsreader_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
