use crate::analysis::types::{AnalysisResult, Exercise};
use crate::error::{AnalysisError, CaptureError};
use chrono::{DateTime, Utc};

/// What went wrong in the most recent cycle. All kinds are transient; a
/// following successful cycle clears the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    Capture,
    Transport,
    Service,
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionError {
    pub kind: SessionErrorKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl SessionError {
    pub(crate) fn capture(err: &CaptureError) -> Self {
        Self {
            kind: SessionErrorKind::Capture,
            message: err.to_string(),
            occurred_at: Utc::now(),
        }
    }

    pub(crate) fn analysis(err: &AnalysisError) -> Self {
        let kind = match err {
            AnalysisError::Transport(_) => SessionErrorKind::Transport,
            AnalysisError::Service { .. } => SessionErrorKind::Service,
            AnalysisError::MalformedResponse(_) => SessionErrorKind::MalformedResponse,
        };
        Self {
            kind,
            message: err.to_string(),
            occurred_at: Utc::now(),
        }
    }
}

/// Authoritative record of one UI session. Owned and mutated exclusively by
/// the orchestrator; everyone else sees whole-value snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub selected_exercise: Exercise,
    pub latest_result: Option<AnalysisResult>,
    pub latest_error: Option<SessionError>,
    /// True for the whole span between request dispatch and result/error
    /// arrival. Sole gate against concurrent requests.
    pub request_in_flight: bool,
    pub continuous_active: bool,
}

impl SessionState {
    pub fn new(selected_exercise: Exercise) -> Self {
        Self {
            selected_exercise,
            latest_result: None,
            latest_error: None,
            request_in_flight: false,
            continuous_active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_error_kinds_map_one_to_one() {
        let transport = SessionError::analysis(&AnalysisError::Transport("timeout".into()));
        assert_eq!(transport.kind, SessionErrorKind::Transport);

        let service = SessionError::analysis(&AnalysisError::Service {
            detail: "bad exercise".into(),
        });
        assert_eq!(service.kind, SessionErrorKind::Service);

        let malformed =
            SessionError::analysis(&AnalysisError::MalformedResponse("no score".into()));
        assert_eq!(malformed.kind, SessionErrorKind::MalformedResponse);
    }

    #[test]
    fn fresh_state_is_idle() {
        let state = SessionState::new(Exercise::Squat);
        assert!(!state.request_in_flight);
        assert!(!state.continuous_active);
        assert!(state.latest_result.is_none());
        assert!(state.latest_error.is_none());
    }
}
