//! Processing service HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use reel_models::{Highlight, HighlightId, Video, VideoId};

use crate::error::{ApiError, ApiResult};
use crate::types::{
    AutoSelectRequest, AutoSelectResponse, FromUrlRequest, GenerateReelRequest, HighlightPatch,
    ReorderRequest, ReelJobHandle, VideoStatusResponse,
};

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the processing service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for retryable read failures
    pub max_retries: u32,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl ApiClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("REEL_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("REEL_API_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: std::env::var("REEL_API_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the processing service REST API.
pub struct ApiClient {
    http: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(ApiClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Submit a local file for processing.
    pub async fn upload_video(
        &self,
        path: &Path,
        title: Option<&str>,
        sport_type: Option<&str>,
    ) -> ApiResult<Video> {
        let url = format!("{}/videos/upload", self.config.base_url);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());
        let bytes = tokio::fs::read(path).await?;

        let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        if let Some(sport_type) = sport_type {
            form = form.text("sport_type", sport_type.to_string());
        }

        debug!("Uploading video to {}", url);
        let response = self.http.post(&url).multipart(form).send().await?;
        Self::parse(response).await
    }

    /// Submit a video by URL for processing.
    pub async fn create_from_url(&self, request: &FromUrlRequest) -> ApiResult<Video> {
        let url = format!("{}/videos/from-url", self.config.base_url);
        let response = self.http.post(&url).json(request).send().await?;
        Self::parse(response).await
    }

    /// Fetch a video's full record.
    pub async fn get_video(&self, video_id: &VideoId) -> ApiResult<Video> {
        let url = format!("{}/videos/{}", self.config.base_url, video_id);
        self.with_retry(|| {
            let request = self.http.get(&url);
            async move { Self::parse(request.send().await?).await }
        })
        .await
    }

    /// Poll a video's processing status.
    pub async fn get_status(&self, video_id: &VideoId) -> ApiResult<VideoStatusResponse> {
        let url = format!("{}/videos/{}/status", self.config.base_url, video_id);
        self.with_retry(|| {
            let request = self.http.get(&url);
            async move { Self::parse(request.send().await?).await }
        })
        .await
    }

    /// Fetch the detected highlights for a video.
    pub async fn get_highlights(&self, video_id: &VideoId) -> ApiResult<Vec<Highlight>> {
        let url = format!("{}/videos/{}/highlights", self.config.base_url, video_id);
        self.with_retry(|| {
            let request = self.http.get(&url);
            async move { Self::parse(request.send().await?).await }
        })
        .await
    }

    /// Apply a partial update to one highlight.
    pub async fn update_highlight(
        &self,
        highlight_id: &HighlightId,
        patch: &HighlightPatch,
    ) -> ApiResult<Highlight> {
        let url = format!("{}/highlights/{}", self.config.base_url, highlight_id);
        let response = self.http.patch(&url).json(patch).send().await?;
        Self::parse(response).await
    }

    /// Persist a full display order for a video's highlights.
    pub async fn persist_order(
        &self,
        video_id: &VideoId,
        order: &[HighlightId],
    ) -> ApiResult<()> {
        let url = format!("{}/highlights/{}/reorder", self.config.base_url, video_id);
        let request = ReorderRequest {
            highlight_order: order.to_vec(),
        };
        let response = self.http.post(&url).json(&request).send().await?;
        Self::check(response).await
    }

    /// Run the server-side auto-selection.
    pub async fn auto_select(
        &self,
        video_id: &VideoId,
        request: &AutoSelectRequest,
    ) -> ApiResult<AutoSelectResponse> {
        let url = format!("{}/highlights/{}/auto-select", self.config.base_url, video_id);
        let response = self.http.post(&url).json(request).send().await?;
        Self::parse(response).await
    }

    /// Start reel generation. A 409 from the service maps to
    /// [`ApiError::Busy`] so callers can distinguish it from a network
    /// failure and avoid duplicate submission.
    pub async fn generate_reel(
        &self,
        video_id: &VideoId,
        request: &GenerateReelRequest,
    ) -> ApiResult<ReelJobHandle> {
        let url = format!("{}/videos/{}/generate-reel", self.config.base_url, video_id);
        let response = self.http.post(&url).json(request).send().await?;
        Self::parse(response).await
    }

    /// Delete a video and its derived data.
    pub async fn delete_video(&self, video_id: &VideoId) -> ApiResult<()> {
        let url = format!("{}/videos/{}", self.config.base_url, video_id);
        let response = self.http.delete(&url).send().await?;
        Self::check(response).await
    }

    /// Map an error response to the client taxonomy.
    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(body),
            StatusCode::CONFLICT => ApiError::Busy,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(body)
            }
            _ => ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// Parse a JSON body from a successful response.
    async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let value = response.json().await?;
        Ok(value)
    }

    /// Check a response where only success matters.
    async fn check(response: Response) -> ApiResult<()> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }

    /// Execute a read with retry and exponential backoff.
    ///
    /// Only idempotent reads go through here; mutating calls are issued
    /// once and left to the caller's retry affordance.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ApiResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "API request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ApiError::InvalidResponse("retry loop exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
    }
}
