use super::animation_repository::AnimationRepository;
use crate::domain::video::{AssetKind, CreateJobRequest, CreatedJob, JobSnapshot};
use async_trait::async_trait;
use reqwest::{multipart, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

/// D-ID implementation of the animation repository
pub struct DidAnimationRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DidAnimationRepository {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    fn upload_path(kind: AssetKind) -> &'static str {
        match kind {
            AssetKind::Image => "images",
            AssetKind::Audio => "audios",
        }
    }
}

#[async_trait]
impl AnimationRepository for DidAnimationRepository {
    async fn upload(
        &self,
        kind: AssetKind,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String> {
        let url = format!("{}/{}", self.base_url, Self::upload_path(kind));
        let size = bytes.len();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| format!("Invalid content type {}: {}", content_type, e))?;
        let form = multipart::Form::new().part(kind.as_str(), part);

        tracing::info!(kind = kind.as_str(), size, "Uploading asset to D-ID");

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.authorization())
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("D-ID {} upload failed: {}", kind.as_str(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!(
                "D-ID {} upload error {}: {}",
                kind.as_str(),
                status,
                body
            ));
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| format!("Failed to parse D-ID upload response: {}", e))?
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| format!("D-ID {} upload response carried no url", kind.as_str()))
    }

    async fn create_job(&self, request: &CreateJobRequest) -> Result<CreatedJob, String> {
        let response = self
            .http_client
            .post(format!("{}/talks", self.base_url))
            .header("Authorization", self.authorization())
            .json(request)
            .send()
            .await
            .map_err(|e| format!("D-ID create talk request failed: {}", e))?;

        let status = response.status();
        if status != StatusCode::CREATED && status != StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "D-ID rejected talk creation");
            return Err(format!("D-ID create talk error {}: {}", status, body));
        }

        response
            .json::<CreatedJob>()
            .await
            .map_err(|e| format!("Failed to parse D-ID create talk response: {}", e))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobSnapshot, String> {
        let response = self
            .http_client
            .get(format!(
                "{}/talks/{}",
                self.base_url,
                urlencoding::encode(job_id)
            ))
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(|e| format!("D-ID talk status request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("D-ID talk status error {}: {}", status, body));
        }

        response
            .json::<JobSnapshot>()
            .await
            .map_err(|e| format!("Failed to parse D-ID talk status: {}", e))
    }
}
