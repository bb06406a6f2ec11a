//! parkwatch - parking-space occupancy inference core
//!
//! This crate infers parking-slot occupancy from video: vehicles are detected
//! frame-by-frame and reconciled against a fixed grid of spatial parking
//! zones. Per-frame decisions are smoothed over a sliding window so a single
//! missed or spurious detection cannot flip a zone's reported state.
//!
//! # Module Structure
//!
//! - `zone`: zone grid construction (fixed for the lifetime of a run)
//! - `detect`: vehicle detector backends behind a stable trait
//! - `resolve`: detection-to-zone overlap resolution (pure)
//! - `stabilize`: temporal majority-vote smoothing with hysteresis
//! - `ingest`: frame sources (synthetic stub, still images)
//! - `pipeline`: the per-session orchestrator producing occupancy reports
//! - `render`: color-coded overlay rendering (no effect on occupancy logic)
//!
//! A session owns all of its mutable state; independent sessions (distinct
//! videos) can run in parallel without coordination.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod stabilize;
pub mod zone;

pub use config::AnalysisConfig;
pub use detect::{
    BackendRegistry, Detection, DetectorAdapter, StubBackend, VehicleClass, VehicleDetector,
};
pub use frame::Frame;
pub use ingest::{FrameSource, SourceStats};
pub use pipeline::{FrameAnalysis, OccupancyReport, OccupancySession, SessionStats, ZoneReading};
pub use resolve::resolve_occupancy;
pub use stabilize::ZoneStabilizer;
pub use zone::{build_zones, Zone};

// -------------------- Error Taxonomy --------------------

/// Fatal pipeline errors.
///
/// End-of-stream is not in this taxonomy: sources signal exhaustion by
/// yielding `None` and the session iterator simply terminates. Per-frame
/// detection failures are recovered locally (the frame reads as zero
/// detections) and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller-supplied configuration is out of range. Rejected before the
    /// session starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The detection backend could not be loaded or initialized. Fatal for
    /// the session; there is no per-frame fallback.
    #[error("detector backend '{backend}' unavailable: {reason}")]
    DetectorUnavailable { backend: String, reason: String },

    /// The frame source could not be opened at all. Fatal, reported once.
    #[error("frame source '{locator}' unreadable: {reason}")]
    SourceUnreadable { locator: String, reason: String },
}

// -------------------- Shared Geometry --------------------

/// Axis-aligned rectangle in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Intersection with another rectangle, or `None` when disjoint.
    /// Edge-touching rectangles have zero overlap and do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x1 < x2 && y1 < y2 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

// -------------------- Zone Occupancy State --------------------

/// Per-zone occupancy classification.
///
/// `Unknown` appears only before the stabilizer has seen its first sample for
/// a zone; once any sample arrives the zone reads `Free` or `Occupied`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneState {
    Unknown,
    Free,
    Occupied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection_overlapping() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Rect::new(50, 50, 50, 50));
        assert_eq!(i.area(), 2500);
    }

    #[test]
    fn rect_intersection_disjoint_and_touching() {
        let a = Rect::new(0, 0, 100, 100);
        assert!(a.intersection(&Rect::new(200, 0, 10, 10)).is_none());
        // Sharing an edge is zero overlap, not an intersection.
        assert!(a.intersection(&Rect::new(100, 0, 10, 10)).is_none());
    }

    #[test]
    fn zone_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ZoneState::Occupied).unwrap(),
            "\"occupied\""
        );
        assert_eq!(serde_json::to_string(&ZoneState::Free).unwrap(), "\"free\"");
    }
}
