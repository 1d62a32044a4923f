use fitcoach::capture::still_source::StillImageSource;
use fitcoach::config::Settings;
use fitcoach::error::AppError;
use fitcoach::overlay::OverlayRenderer;
use fitcoach::session::Session;
use fitcoach::{Exercise, PostureApiClient};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn, Level};

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let settings = Settings::load()?;

    let exercise = match std::env::args().nth(1) {
        Some(arg) => Exercise::from_str(&arg).map_err(|e| AppError::Builder(e.to_string()))?,
        None => settings.session.default_exercise,
    };
    info!(%exercise, backend = %settings.backend.base_url, "starting analysis session");

    let session = Session::builder()
        .capture(StillImageSource::new(&settings.capture.image_path))
        .client(PostureApiClient::from_settings(&settings.backend)?)
        .exercise(exercise)
        .tick_period(Duration::from_millis(settings.session.tick_period_ms))
        .build()?;

    let state = session.handle().analyze_once().await?;
    let view = OverlayRenderer::project(&state);
    match view.status {
        Some(status) => {
            info!("form status: {status}");
            for correction in &view.corrections {
                info!("correction: {correction}");
            }
            if let Some(feedback) = &view.feedback {
                info!("coach feedback: {feedback}");
            }
        }
        None => warn!(
            "analysis produced no result: {}",
            view.error_message
                .unwrap_or_else(|| "no error recorded".to_string())
        ),
    }

    session.stop();
    Ok(())
}
