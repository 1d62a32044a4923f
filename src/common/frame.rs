use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// One snapshot from the capture device, already encoded as JPEG.
/// Created fresh on every capture and never mutated; clones share the
/// underlying buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    jpeg: Arc<Vec<u8>>,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
}

impl Frame {
    pub fn from_jpeg(jpeg: Vec<u8>) -> Self {
        Self {
            jpeg: Arc::new(jpeg),
            captured_at: Utc::now(),
            frame_id: Uuid::new_v4(),
        }
    }

    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.jpeg.as_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }
}
