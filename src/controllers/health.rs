use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::VideoBackend;
use crate::infrastructure::repositories::LipSyncRepository;

pub struct HealthState {
    pub backend: VideoBackend,
    pub lip_sync: Option<Arc<dyn LipSyncRepository>>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    match (&state.backend, &state.lip_sync) {
        (VideoBackend::Wav2Lip, Some(lip_sync)) => match lip_sync.checkpoint() {
            Some(checkpoint) => (
                StatusCode::OK,
                Json(json!({
                    "status": "ready",
                    "video_backend": "wav2lip",
                    "checkpoint": checkpoint.display().to_string()
                })),
            ),
            None => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "video_backend": "wav2lip",
                    "checkpoint": null
                })),
            ),
        },
        (backend, _) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "video_backend": backend.as_str()
            })),
        ),
    }
}
