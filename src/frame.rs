//! Frame container.
//!
//! A `Frame` is an immutable RGB24 pixel grid plus its position in the source
//! stream. Every pipeline stage borrows it read-only; the orchestrator owns
//! it transiently for the duration of one processing step.

use crate::Rect;

/// Immutable RGB24 frame.
pub struct Frame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Position in the source stream, starting at 0. Monotonic per source.
    pub index: u64,
}

impl Frame {
    /// Create a frame. Called by the ingestion layer; `data` must be exactly
    /// `width * height * 3` bytes.
    pub(crate) fn new(data: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 3);
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// Read-only pixel access for detectors and the renderer.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Full-frame bounds, for overlap tests against detections.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Copy out the pixel buffer (used by the renderer to annotate a copy).
    pub fn to_rgb_vec(&self) -> Vec<u8> {
        self.data.clone()
    }
}
