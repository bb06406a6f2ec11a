use serde::{Deserialize, Serialize};

use crate::Rect;

/// One vehicle-like bounding box emitted by a detector for a single frame.
///
/// Detections are produced fresh per frame and are not persisted beyond that
/// frame's resolution step.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in frame pixel coordinates.
    pub rect: Rect,
    pub class: VehicleClass,
    /// Model confidence in [0, 1].
    pub confidence: f32,
}

/// Vehicle categories the occupancy logic accepts.
///
/// All variants are equivalent for occupancy purposes; the distinction only
/// survives into rendering and logs. Backends discard non-vehicle classes
/// before they reach here.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
    Motorcycle,
}
