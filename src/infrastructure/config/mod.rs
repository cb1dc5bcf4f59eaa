use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MALE_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
const DEFAULT_FEMALE_VOICE_ID: &str = "21m00Tcm4TxJBc9YBNOV";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub max_upload_bytes: usize,
    // ElevenLabs
    pub elevenlabs_api_key: String,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model_id: String,
    pub elevenlabs_male_voice_id: String,
    pub elevenlabs_female_voice_id: String,
    // D-ID
    pub did_api_key: String,
    pub did_base_url: String,
    // Video rendering
    pub video_backend: VideoBackend,
    pub video_poll_interval: Duration,
    pub video_poll_max_attempts: u32,
    pub work_dir: PathBuf,
    // Wav2Lip
    pub wav2lip_python: String,
    pub wav2lip_script: PathBuf,
    pub wav2lip_checkpoint: PathBuf,
    pub wav2lip_fallback_checkpoint: PathBuf,
    pub wav2lip_output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Which collaborator turns audio + face into a video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoBackend {
    Did,
    Wav2Lip,
}

impl VideoBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoBackend::Did => "did",
            VideoBackend::Wav2Lip => "wav2lip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown video backend {0:?}, expected \"did\" or \"wav2lip\"")]
pub struct UnknownVideoBackend(pub String);

impl FromStr for VideoBackend {
    type Err = UnknownVideoBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "did" | "d-id" => Ok(VideoBackend::Did),
            "wav2lip" => Ok(VideoBackend::Wav2Lip),
            other => Err(UnknownVideoBackend(other.to_string())),
        }
    }
}

/// Startup configuration failure. Fatal: the server never starts with a partial config.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for environment variable {name}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let video_poll_max_attempts: u32 = vars.parse_or("VIDEO_POLL_MAX_ATTEMPTS", 20)?;
        if video_poll_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "VIDEO_POLL_MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        let config = Config {
            host: vars.or("HOST", "0.0.0.0"),
            port: vars.parse_or("PORT", 8080)?,
            environment: match vars.or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match vars.or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            max_upload_bytes: vars.parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            elevenlabs_api_key: vars.required("ELEVENLABS_API_KEY")?,
            elevenlabs_base_url: vars.or("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io"),
            elevenlabs_model_id: vars.or("ELEVENLABS_MODEL_ID", "eleven_multilingual_v2"),
            elevenlabs_male_voice_id: vars.or("ELEVENLABS_MALE_VOICE_ID", DEFAULT_MALE_VOICE_ID),
            elevenlabs_female_voice_id: vars
                .or("ELEVENLABS_FEMALE_VOICE_ID", DEFAULT_FEMALE_VOICE_ID),
            did_api_key: vars.required("DID_API_KEY")?,
            did_base_url: vars.or("DID_BASE_URL", "https://api.d-id.com"),
            video_backend: vars.parse_or("VIDEO_BACKEND", VideoBackend::Did)?,
            video_poll_interval: Duration::from_millis(
                vars.parse_or("VIDEO_POLL_INTERVAL_MS", 2000)?,
            ),
            video_poll_max_attempts,
            work_dir: absolute_dir("WORK_DIR", vars.or("WORK_DIR", "."))?,
            wav2lip_python: vars.or("WAV2LIP_PYTHON", "python"),
            wav2lip_script: vars.or("WAV2LIP_SCRIPT", "Wav2Lip/inference.py").into(),
            wav2lip_checkpoint: vars
                .or("WAV2LIP_CHECKPOINT", "Wav2Lip/checkpoints/wav2lip_gan.pth")
                .into(),
            wav2lip_fallback_checkpoint: vars
                .or("WAV2LIP_FALLBACK_CHECKPOINT", "wav2lip_gan.pth")
                .into(),
            wav2lip_output: vars.or("WAV2LIP_OUTPUT", "results/result_voice.mp4").into(),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Output file of the local lip-sync run, resolved against the work directory
    pub fn local_video_path(&self) -> PathBuf {
        self.work_dir.join(&self.wav2lip_output)
    }
}

/// Child processes run inside the work directory, so every path derived
/// from it must already be absolute
fn absolute_dir(name: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    std::path::absolute(Path::new(&value)).map_err(|_| ConfigError::Invalid { name, value })
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }
}
