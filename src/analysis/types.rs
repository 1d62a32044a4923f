use crate::common::frame::Frame;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Exercises the analysis service knows how to score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    Squat,
    Pushup,
    Plank,
    Lunge,
    Deadlift,
}

impl Exercise {
    pub const ALL: [Exercise; 5] = [
        Exercise::Squat,
        Exercise::Pushup,
        Exercise::Plank,
        Exercise::Lunge,
        Exercise::Deadlift,
    ];

    /// Wire token used in `exercise_type` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Squat => "squat",
            Exercise::Pushup => "pushup",
            Exercise::Plank => "plank",
            Exercise::Lunge => "lunge",
            Exercise::Deadlift => "deadlift",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown exercise type: {0}")]
pub struct UnknownExercise(pub String);

impl FromStr for Exercise {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squat" => Ok(Exercise::Squat),
            "pushup" => Ok(Exercise::Pushup),
            "plank" => Ok(Exercise::Plank),
            "lunge" => Ok(Exercise::Lunge),
            "deadlift" => Ok(Exercise::Deadlift),
            other => Err(UnknownExercise(other.to_string())),
        }
    }
}

/// One analysis call: a frame, the exercise it should be scored against, and
/// whether the service should render a pose overlay into the response.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    frame: Frame,
    exercise: Exercise,
    wants_overlay: bool,
}

impl AnalysisRequest {
    pub fn new(frame: Frame, exercise: Exercise, wants_overlay: bool) -> Self {
        Self {
            frame,
            exercise,
            wants_overlay,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn wants_overlay(&self) -> bool {
        self.wants_overlay
    }
}

/// Validated result of one posture analysis. Immutable once produced;
/// replaces the previous result in the session state as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Overall form quality in [0, 1].
    pub form_score: f32,
    /// Detection confidence in [0, 1].
    pub confidence: f32,
    pub is_correct_form: bool,
    /// Ordered corrections, most important first. May be empty.
    pub corrections: Vec<String>,
    pub feedback: Option<String>,
    pub exercise_type: Exercise,
    pub analysis_time_ms: u64,
    /// Decoded overlay JPEG/PNG bytes, present when requested and available.
    pub overlay_image: Option<Vec<u8>>,
    /// Named landmark positions in normalized image coordinates.
    pub key_points: HashMap<String, (f32, f32)>,
}
