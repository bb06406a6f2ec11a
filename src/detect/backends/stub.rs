use anyhow::Result;

use crate::detect::backend::VehicleDetector;
use crate::detect::result::{Detection, VehicleClass};
use crate::Rect;

/// How many frames a synthetic vehicle dwells before the schedule advances.
const DWELL_FRAMES: u64 = 25;

/// Nominal stall layout the schedule cycles through (3 columns x 2 rows).
const STALL_COLS: u32 = 3;
const STALL_ROWS: u32 = 2;

/// Stub backend for tests and the demo. Emits a deterministic, frame-indexed
/// schedule of vehicle boxes: most stalls hold a vehicle, one rotates free
/// every `DWELL_FRAMES` frames, and one box is reported at low confidence so
/// threshold filtering is exercised end to end. No pixel inspection.
pub struct StubBackend {
    frame_count: u64,
}

impl StubBackend {
    pub fn new() -> Self {
        Self { frame_count: 0 }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleDetector for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>> {
        let phase = self.frame_count / DWELL_FRAMES;
        self.frame_count += 1;

        let cell_w = width / STALL_COLS;
        let cell_h = height / STALL_ROWS;
        let classes = [
            VehicleClass::Car,
            VehicleClass::Truck,
            VehicleClass::Car,
            VehicleClass::Bus,
            VehicleClass::Car,
            VehicleClass::Motorcycle,
        ];

        let mut detections = Vec::new();
        for stall in 0..(STALL_COLS * STALL_ROWS) as u64 {
            // One stall rotates free each phase.
            if (phase + stall) % (STALL_COLS * STALL_ROWS) as u64 == 0 {
                continue;
            }
            let col = (stall as u32) % STALL_COLS;
            let row = (stall as u32) / STALL_COLS;
            // Inset box covering ~64% of the stall cell.
            let rect = Rect::new(
                col * cell_w + cell_w / 10,
                row * cell_h + cell_h / 10,
                cell_w * 8 / 10,
                cell_h * 8 / 10,
            );
            // Stall 5 reports below the default confidence threshold.
            let confidence = if stall == 5 { 0.42 } else { 0.91 };
            detections.push(Detection {
                rect,
                class: classes[stall as usize % classes.len()],
                confidence,
            });
        }
        Ok(detections)
    }
}
