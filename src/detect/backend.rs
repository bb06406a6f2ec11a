use anyhow::Result;

use crate::detect::result::Detection;

/// Vehicle detector backend trait.
///
/// This is the swap point for detection models: anything that can turn a
/// frame into vehicle bounding boxes plugs in here without touching zone
/// logic. Implementations:
/// - must treat the pixel slice as read-only and ephemeral
/// - must report detections in frame pixel coordinates
/// - may keep internal model state across frames of one session
///
/// Confidence filtering and class filtering happen in `DetectorAdapter`, not
/// in backends; backends return everything vehicle-like they see.
pub trait VehicleDetector: Send {
    /// Backend identifier, used for registry lookup and logs.
    fn name(&self) -> &'static str;

    /// Load/initialize the underlying model. Called once at session start;
    /// failure here is fatal for the session.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }

    /// Run detection on one RGB24 frame.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>>;
}
