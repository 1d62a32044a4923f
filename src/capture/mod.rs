pub mod still_source;

use crate::common::frame::Frame;
use crate::error::CaptureError;
use async_trait::async_trait;

/// A live video device that can produce an on-demand JPEG snapshot.
/// Capturing reads the current device frame and nothing else; no state is
/// retained between calls.
#[async_trait]
pub trait CaptureSource: Send {
    async fn capture(&mut self) -> Result<Frame, CaptureError>;
}
