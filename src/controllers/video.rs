use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::{
        pipeline::{GenerateVideoCommand, GeneratedVideo, NewsVideoService},
        speech::{LanguageCode, VoiceSelector},
        video::{ImageAsset, VideoLocation},
    },
    error::{AppError, AppResult},
    infrastructure::config::{Config, VideoBackend},
};

const MAX_TEXT_CHARS: usize = 10_000;
pub const DOWNLOAD_PATH: &str = "/api/videos/download";
const DOWNLOAD_FILE_NAME: &str = "AI_News.mp4";

/// Response for POST /api/videos
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoResponse {
    pub language: LanguageCode,
    pub video_url: String,
    pub backend: String,
    pub char_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl From<GeneratedVideo> for VideoResponse {
    fn from(video: GeneratedVideo) -> Self {
        let video_url = match video.location {
            VideoLocation::Url(url) => url,
            VideoLocation::File(_) => DOWNLOAD_PATH.to_string(),
        };

        Self {
            language: video.language,
            video_url,
            backend: video.backend.as_str().to_string(),
            char_count: video.char_count,
            generated_at: video.generated_at,
        }
    }
}

pub struct VideoController {
    news_video_service: Arc<NewsVideoService>,
    config: Arc<Config>,
}

impl VideoController {
    pub fn new(news_video_service: Arc<NewsVideoService>, config: Arc<Config>) -> Self {
        Self {
            news_video_service,
            config,
        }
    }

    /// POST /api/videos - Turn news text and a face photo into a talking-head video
    pub async fn generate(
        State(controller): State<Arc<VideoController>>,
        multipart: Multipart,
    ) -> AppResult<Json<VideoResponse>> {
        let command = read_form(multipart).await?;

        let video = controller
            .news_video_service
            .generate(command)
            .await
            .map_err(AppError::from)?;

        Ok(Json(video.into()))
    }

    /// GET /api/videos/download - Latest locally rendered video
    pub async fn download(
        State(controller): State<Arc<VideoController>>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        // Remote videos are served by the provider; a local file here would be left over
        if controller.config.video_backend != VideoBackend::Wav2Lip {
            return Err(AppError::NotFound(
                "Downloads are only available for locally rendered videos".to_string(),
            ));
        }

        let path = controller.config.local_video_path();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(
                    "No video has been generated yet".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"AI_News.mp4\""),
        );

        tracing::info!(
            path = %path.display(),
            size = bytes.len(),
            file_name = DOWNLOAD_FILE_NAME,
            "Serving local video"
        );

        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }
}

async fn read_form(mut multipart: Multipart) -> AppResult<GenerateVideoCommand> {
    let mut text = None;
    let mut voice = None;
    let mut face = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => {
                text = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Unreadable text field: {}", e))
                })?);
            }
            "voice" => {
                voice = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Unreadable voice field: {}", e))
                })?);
            }
            "face" => {
                let file_name = field.file_name().unwrap_or("face").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Unreadable face image: {}", e))
                })?;
                face = Some(image_asset(file_name, content_type, bytes.to_vec())?);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    let text = text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("Please enter news content".to_string()));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::PayloadTooLarge(
            "Text must be 10,000 characters or less".to_string(),
        ));
    }

    let face = face.ok_or_else(|| AppError::BadRequest("Please upload a face image".to_string()))?;

    let voice = match voice.as_deref().map(str::trim) {
        None | Some("") => VoiceSelector::default(),
        Some(value) => value.parse::<VoiceSelector>().map_err(AppError::from)?,
    };

    Ok(GenerateVideoCommand { text, face, voice })
}

/// Accept JPEG or PNG, judged by content type and falling back to the file extension
fn image_asset(
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
) -> AppResult<ImageAsset> {
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Face image is empty".to_string()));
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    let content_type = match content_type.as_deref() {
        Some("image/jpeg") | Some("image/jpg") => "image/jpeg",
        Some("image/png") => "image/png",
        None | Some("application/octet-stream") => match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            _ => {
                return Err(AppError::BadRequest(
                    "Face image must be a JPG or PNG file".to_string(),
                ))
            }
        },
        Some(_) => {
            return Err(AppError::BadRequest(
                "Face image must be a JPG or PNG file".to_string(),
            ))
        }
    };

    Ok(ImageAsset {
        bytes,
        file_name,
        content_type: content_type.to_string(),
    })
}
