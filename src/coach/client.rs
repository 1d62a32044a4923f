use crate::analysis::wire::error_detail;
use crate::coach::types::{
    ExerciseLibrary, NutritionAdviceRequest, NutritionAdviceResponse, WorkoutPlanRequest,
    WorkoutPlanResponse,
};
use crate::config::BackendSettings;
use crate::error::{AppError, CoachError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Single-shot client for the plan/advice endpoints. Fire-once requests with
/// no recurring schedule, so none of the session-side concurrency discipline
/// applies here.
pub struct CoachClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoachClient {
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

    pub async fn workout_plan(
        &self,
        request: &WorkoutPlanRequest,
    ) -> Result<WorkoutPlanResponse, CoachError> {
        self.post_json("/workout-plan", request).await
    }

    pub async fn nutrition_advice(
        &self,
        request: &NutritionAdviceRequest,
    ) -> Result<NutritionAdviceResponse, CoachError> {
        self.post_json("/nutrition-advice", request).await
    }

    pub async fn exercise_library(&self) -> Result<ExerciseLibrary, CoachError> {
        let response = self
            .http
            .get(format!("{}/exercise-library", self.base_url))
            .send()
            .await
            .map_err(|e| CoachError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    pub async fn health(&self) -> Result<(), CoachError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| CoachError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(CoachError::Service {
                detail: response.status().to_string(),
            })
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoachError> {
        debug!(path, "dispatching coach request");
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| CoachError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CoachError> {
        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(CoachError::Service { detail });
        }
        response
            .json()
            .await
            .map_err(|e| CoachError::MalformedResponse(e.to_string()))
    }
}
