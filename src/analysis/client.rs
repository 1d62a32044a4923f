use crate::analysis::types::{AnalysisRequest, AnalysisResult};
use crate::analysis::wire::{error_detail, AnalysisResponseBody};
use crate::config::BackendSettings;
use crate::error::{AnalysisError, AppError};
use async_trait::async_trait;
use reqwest::multipart;
use std::time::Duration;
use tracing::debug;

/// Boundary to the remote posture-analysis endpoint. Implementations suspend
/// the caller until the service responds or the transport deadline elapses;
/// they never touch session state.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

/// `reqwest`-backed client for `POST /analyze-posture`.
pub struct PostureApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostureApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self, AppError> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_millis(settings.request_timeout_ms),
        )
    }
}

#[async_trait]
impl AnalysisClient for PostureApiClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let frame = request.frame();
        debug!(
            frame_id = %frame.frame_id(),
            exercise = %request.exercise(),
            bytes = frame.len(),
            "dispatching posture analysis"
        );

        let file = multipart::Part::bytes(frame.to_vec())
            .file_name(format!("{}.jpg", frame.frame_id()))
            .mime_str("image/jpeg")
            .map_err(|e| AnalysisError::Transport(format!("failed to encode frame part: {e}")))?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("exercise_type", request.exercise().as_str())
            .text(
                "include_pose_overlay",
                if request.wants_overlay() { "true" } else { "false" },
            );

        let response = self
            .http
            .post(format!("{}/analyze-posture", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Transport(format!("deadline elapsed: {e}"))
                } else {
                    AnalysisError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(AnalysisError::Service { detail });
        }

        let body: AnalysisResponseBody = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
        body.try_into()
    }
}
