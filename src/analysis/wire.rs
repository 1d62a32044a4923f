use crate::analysis::types::AnalysisResult;
use crate::error::AnalysisError;
use base64::Engine;
use serde::Deserialize;
use std::collections::HashMap;

/// Success body of `POST /analyze-posture`, exactly as the service sends it.
/// The service reports `analysis_time_ms` as a rounded float.
#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisResponseBody {
    pub form_score: f32,
    pub confidence: f32,
    pub is_correct_form: bool,
    #[serde(default)]
    pub corrections: Vec<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    pub exercise_type: String,
    pub analysis_time_ms: f64,
    #[serde(default)]
    pub pose_overlay_image: Option<String>,
    #[serde(default)]
    pub key_points: HashMap<String, (f32, f32)>,
}

/// Error body of any backend endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

/// Pulls the `detail` string out of an error response, falling back to the
/// status line when the body is not the expected JSON.
pub(crate) async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    response
        .json::<ErrorBody>()
        .await
        .map(|body| body.detail)
        .unwrap_or_else(|_| status.to_string())
}

fn unit_interval(name: &str, value: f32) -> Result<f32, AnalysisError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AnalysisError::MalformedResponse(format!(
            "{name} out of range: {value}"
        )))
    }
}

impl TryFrom<AnalysisResponseBody> for AnalysisResult {
    type Error = AnalysisError;

    fn try_from(body: AnalysisResponseBody) -> Result<Self, Self::Error> {
        let form_score = unit_interval("form_score", body.form_score)?;
        let confidence = unit_interval("confidence", body.confidence)?;
        let exercise_type = body
            .exercise_type
            .parse()
            .map_err(|e| AnalysisError::MalformedResponse(format!("{e}")))?;
        if body.analysis_time_ms < 0.0 || !body.analysis_time_ms.is_finite() {
            return Err(AnalysisError::MalformedResponse(format!(
                "analysis_time_ms out of range: {}",
                body.analysis_time_ms
            )));
        }
        let overlay_image = body
            .pose_overlay_image
            .map(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| {
                        AnalysisError::MalformedResponse(format!("pose_overlay_image: {e}"))
                    })
            })
            .transpose()?;

        Ok(AnalysisResult {
            form_score,
            confidence,
            is_correct_form: body.is_correct_form,
            corrections: body.corrections,
            feedback: body.feedback,
            exercise_type,
            analysis_time_ms: body.analysis_time_ms.round() as u64,
            overlay_image,
            key_points: body.key_points,
        })
    }
}
