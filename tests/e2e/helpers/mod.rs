use axum::Router;
use newsreader_backend::infrastructure::config::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};


use api_client::TestClient;

pub const TALK_ID: &str = "tlk_e2e";

/// A sentence lingua recognizes as English without hesitation
pub const ENGLISH_NEWS: &str = "The city council approved the new budget for public schools \
     and transport on Tuesday evening after a long debate.";

pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub config: Config,
    pub elevenlabs: MockServer,
    pub did: MockServer,
    pub work_dir: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let elevenlabs = MockServer::start().await;
            let did = MockServer::start().await;
            let work_dir = tempfile::tempdir().expect("Failed to create work dir");

            let config = test_config(
                &[
                    ("ELEVENLABS_BASE_URL", elevenlabs.uri()),
                    ("DID_BASE_URL", did.uri()),
                ],
                &work_dir,
            );
            let client = spawn_app(config.clone()).await;

            Self {
                client,
                config,
                elevenlabs,
                did,
                work_dir,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Mock servers and the work dir are released on drop
        }
    }
}

impl TestContext {
    /// ElevenLabs answers every synthesis call with a few MP3 bytes
    pub async fn mock_tts_ok(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1/text-to-speech/.+$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(vec![0x49u8, 0x44, 0x33, 0x04]),
            )
            .mount(&self.elevenlabs)
            .await;
    }

    /// D-ID accepts both uploads and creates the talk
    pub async fn mock_did_job_created(&self) {
        Mock::given(method("POST"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "url": "s3://d-id/face.jpg" })))
            .mount(&self.did)
            .await;
        Mock::given(method("POST"))
            .and(path("/audios"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "url": "s3://d-id/news_audio.mp3" })))
            .mount(&self.did)
            .await;
        Mock::given(method("POST"))
            .and(path("/talks"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "id": TALK_ID, "status": "created" })),
            )
            .mount(&self.did)
            .await;
    }

    /// Every status poll returns the same body
    pub async fn mock_did_status(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/talks/{}", TALK_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.did)
            .await;
    }

    pub async fn did_status_polls(&self) -> usize {
        self.did
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.to_string() == "GET")
            .count()
    }

    pub async fn did_requests(&self) -> usize {
        self.did.received_requests().await.unwrap_or_default().len()
    }
}

/// Config for tests: fast polling, three attempts, everything inside `work_dir`
pub fn test_config(overrides: &[(&str, String)], work_dir: &TempDir) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("HOST".to_string(), "127.0.0.1".to_string()),
        ("PORT".to_string(), "0".to_string()),
        ("ELEVENLABS_API_KEY".to_string(), "test-elevenlabs-key".to_string()),
        ("DID_API_KEY".to_string(), "test-did-key".to_string()),
        ("VIDEO_POLL_INTERVAL_MS".to_string(), "10".to_string()),
        ("VIDEO_POLL_MAX_ATTEMPTS".to_string(), "3".to_string()),
        (
            "WORK_DIR".to_string(),
            work_dir.path().to_string_lossy().to_string(),
        ),
    ]);
    for (name, value) in overrides {
        vars.insert(name.to_string(), value.clone());
    }

    Config::from_lookup(|name: &str| vars.get(name).cloned()).expect("Invalid test config")
}

/// Start the app on an ephemeral port and return a client for it
pub async fn spawn_app(config: Config) -> TestClient {
    let app = create_app(config);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestClient::new(&base_url)
}

fn create_app(config: Config) -> Router {
    use newsreader_backend::{
        controllers::{health::HealthState, video::VideoController},
        domain::{
            pipeline::NewsVideoService,
            speech::SpeechService,
            video::{LocalVideoRenderer, PollSettings, RemoteVideoRenderer, VideoRenderer},
        },
        infrastructure::{
            config::VideoBackend,
            http::build_router,
            repositories::{
                DidAnimationRepository, ElevenLabsTtsRepository, LipSyncRepository,
                Wav2LipRepository,
            },
        },
    };

    let config = Arc::new(config);

    let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
        config.elevenlabs_base_url.clone(),
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_model_id.clone(),
        config.elevenlabs_male_voice_id.clone(),
        config.elevenlabs_female_voice_id.clone(),
    ));

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
                let renderer: Arc<dyn VideoRenderer> = Arc::new(LocalVideoRenderer::new(
                    lip_sync.clone(),
                    config.work_dir.clone(),
                ));
                (renderer, Some(lip_sync))
            }
        };

    let speech_service = Arc::new(SpeechService::new(tts_repo));
    let news_video_service = Arc::new(NewsVideoService::new(speech_service, renderer));
    let video_controller = Arc::new(VideoController::new(news_video_service, config.clone()));
    let health_state = Arc::new(HealthState {
        backend: config.video_backend,
        lip_sync,
    });

    build_router(&config, health_state, video_controller)
}
