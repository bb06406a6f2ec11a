//! Still-image source.
//!
//! Decodes one local image into a single frame, then reports exhaustion.
//! This backs the single-shot verification path: drive a full session over a
//! sample parking-lot photo with zero frame skip.

use crate::frame::Frame;
use crate::PipelineError;

pub(super) struct StillImageSource {
    frame: Option<Frame>,
    captured: u64,
}

impl StillImageSource {
    pub(super) fn open(path: &str) -> Result<Self, PipelineError> {
        let unreadable = |reason: String| PipelineError::SourceUnreadable {
            locator: path.to_string(),
            reason,
        };

        let image = image::open(path).map_err(|e| unreadable(e.to_string()))?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(unreadable("image has zero dimensions".to_string()));
        }

        Ok(Self {
            frame: Some(Frame::new(rgb.into_raw(), width, height, 0)),
            captured: 0,
        })
    }

    pub(super) fn next_frame(&mut self) -> Option<Frame> {
        let frame = self.frame.take();
        if frame.is_some() {
            self.captured += 1;
        }
        frame
    }

    pub(super) fn frames_captured(&self) -> u64 {
        self.captured
    }
}
