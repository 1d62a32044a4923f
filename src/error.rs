use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Coach Error: {0}")]
    Coach(#[from] CoachError),
    #[error("Food Log Error: {0}")]
    FoodLog(#[from] FoodLogError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Another analysis request is already in progress.")]
    SessionBusy,
    #[error("The session has been shut down.")]
    SessionClosed,
    #[error("Failed to build session: {0}")]
    Builder(String),
}

// Capture Error Type
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device is not ready: {0}")]
    DeviceNotReady(String),
    #[error("Capture device disconnected: {0}")]
    Disconnected(String),
    #[error("Failed to produce a frame: {0}")]
    BadFrame(String),
}

// Failure classification for the posture-analysis endpoint. Transport means
// no usable response arrived (connect error or deadline elapsed), Service is
// an error status with a detail string from the remote, MalformedResponse is
// a success status whose body failed schema validation.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No response from analysis service: {0}")]
    Transport(String),
    #[error("Analysis service returned an error: {detail}")]
    Service { detail: String },
    #[error("Analysis response failed validation: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("No response from coach service: {0}")]
    Transport(String),
    #[error("Coach service returned an error: {detail}")]
    Service { detail: String },
    #[error("Coach response failed validation: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum FoodLogError {
    #[error("Failed to access food log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Food log file is corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}
