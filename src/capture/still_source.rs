use crate::capture::CaptureSource;
use crate::common::frame::Frame;
use crate::error::CaptureError;
use async_trait::async_trait;
use image::ImageFormat;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::debug;

/// File-backed capture source. Reads the configured image on every capture,
/// re-encoding to JPEG when the file is some other format. Stands in for a
/// live camera in the demo binary and in tests; it fails the same way a real
/// device does when the file is missing or unreadable.
pub struct StillImageSource {
    path: PathBuf,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureSource for StillImageSource {
    async fn capture(&mut self) -> Result<Frame, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            CaptureError::DeviceNotReady(format!("{}: {e}", self.path.display()))
        })?;

        let format = image::guess_format(&bytes)
            .map_err(|e| CaptureError::BadFrame(e.to_string()))?;
        if format == ImageFormat::Jpeg {
            debug!(path = %self.path.display(), bytes = bytes.len(), "captured still frame");
            return Ok(Frame::from_jpeg(bytes));
        }

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| CaptureError::BadFrame(e.to_string()))?;
        let mut jpeg = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .map_err(|e| CaptureError::BadFrame(e.to_string()))?;
        debug!(path = %self.path.display(), bytes = jpeg.len(), "captured and re-encoded still frame");
        Ok(Frame::from_jpeg(jpeg))
    }
}
