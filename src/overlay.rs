use crate::session::state::SessionState;
use std::fmt;

/// Classification of a form score into the fixed feedback buckets. Boundary
/// values land in the higher bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

impl FormStatus {
    /// Total over [0, 1]: >= 0.8 excellent, >= 0.6 good, >= 0.4 needs
    /// improvement, below that poor.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            FormStatus::Excellent
        } else if score >= 0.6 {
            FormStatus::Good
        } else if score >= 0.4 {
            FormStatus::NeedsImprovement
        } else {
            FormStatus::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Excellent => "excellent",
            FormStatus::Good => "good",
            FormStatus::NeedsImprovement => "needs improvement",
            FormStatus::Poor => "poor",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the camera view draws on top of the live feed, derived from
/// the current session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayView {
    pub overlay_image: Option<Vec<u8>>,
    pub status: Option<FormStatus>,
    pub corrections: Vec<String>,
    pub feedback: Option<String>,
    pub error_message: Option<String>,
}

pub struct OverlayRenderer;

impl OverlayRenderer {
    /// Pure projection; holds no state of its own and is re-evaluated on
    /// every session-state change.
    pub fn project(state: &SessionState) -> OverlayView {
        let mut view = OverlayView::default();
        if let Some(result) = &state.latest_result {
            view.overlay_image = result.overlay_image.clone();
            view.status = Some(FormStatus::from_score(result.form_score));
            view.corrections = result.corrections.clone();
            view.feedback = result.feedback.clone();
        }
        view.error_message = state.latest_error.as_ref().map(|e| e.message.clone());
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{AnalysisResult, Exercise};
    use crate::error::AnalysisError;
    use crate::session::state::SessionError;

    fn result_with_score(score: f32) -> AnalysisResult {
        AnalysisResult {
            form_score: score,
            confidence: 0.9,
            is_correct_form: score >= 0.7,
            corrections: vec![],
            feedback: None,
            exercise_type: Exercise::Squat,
            analysis_time_ms: 12,
            overlay_image: None,
            key_points: Default::default(),
        }
    }

    fn state_with_score(score: f32) -> SessionState {
        let mut state = SessionState::new(Exercise::Squat);
        state.latest_result = Some(result_with_score(score));
        state
    }

    #[test]
    fn boundary_scores_land_in_the_higher_bucket() {
        assert_eq!(FormStatus::from_score(0.8), FormStatus::Excellent);
        assert_eq!(FormStatus::from_score(0.6), FormStatus::Good);
        assert_eq!(FormStatus::from_score(0.4), FormStatus::NeedsImprovement);
    }

    #[test]
    fn mapping_is_total_over_the_unit_interval() {
        for step in 0..=100 {
            let score = step as f32 / 100.0;
            // every score classifies; from_score has no gap to panic on
            let _ = FormStatus::from_score(score);
        }
        assert_eq!(FormStatus::from_score(0.0), FormStatus::Poor);
        assert_eq!(FormStatus::from_score(1.0), FormStatus::Excellent);
    }

    #[test]
    fn middling_score_with_no_corrections_renders_no_items() {
        let state = state_with_score(0.55);
        let view = OverlayRenderer::project(&state);
        assert_eq!(view.status, Some(FormStatus::NeedsImprovement));
        assert!(view.corrections.is_empty());
    }

    #[test]
    fn empty_state_projects_an_empty_view() {
        let state = SessionState::new(Exercise::Plank);
        let view = OverlayRenderer::project(&state);
        assert_eq!(view, OverlayView::default());
    }

    #[test]
    fn stale_result_and_fresh_error_are_shown_together() {
        let mut state = state_with_score(0.9);
        state.latest_error = Some(SessionError::analysis(&AnalysisError::Service {
            detail: "pose not detected".to_string(),
        }));
        let view = OverlayRenderer::project(&state);
        assert_eq!(view.status, Some(FormStatus::Excellent));
        assert!(view.error_message.unwrap().contains("pose not detected"));
    }

    #[test]
    fn overlay_bytes_come_from_the_latest_result() {
        let mut state = state_with_score(0.7);
        state.latest_result.as_mut().unwrap().overlay_image = Some(vec![1, 2, 3]);
        let view = OverlayRenderer::project(&state);
        assert_eq!(view.overlay_image.as_deref(), Some([1, 2, 3].as_slice()));
    }

    #[test]
    fn status_strings_match_the_ui_copy() {
        assert_eq!(FormStatus::Excellent.to_string(), "excellent");
        assert_eq!(FormStatus::NeedsImprovement.to_string(), "needs improvement");
    }
}
