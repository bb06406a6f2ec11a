//! Color-coded overlay rendering.
//!
//! Draws zone rectangles (red occupied, green free, amber unknown) and
//! detection boxes onto a copy of the frame for the external dashboard/CLI.
//! Rendering consumes occupancy results; it never feeds back into them.

use crate::detect::Detection;
use crate::frame::Frame;
use crate::pipeline::OccupancyReport;
use crate::{Rect, ZoneState};

pub const COLOR_OCCUPIED: [u8; 3] = [220, 50, 50];
pub const COLOR_FREE: [u8; 3] = [60, 200, 90];
pub const COLOR_UNKNOWN: [u8; 3] = [230, 190, 60];
pub const COLOR_DETECTION: [u8; 3] = [70, 120, 230];

const ZONE_STROKE: u32 = 3;
const DETECTION_STROKE: u32 = 2;

/// Produce the annotated companion frame for one report.
///
/// With `show_original` set the copy is returned untouched; occupancy logic
/// is unaffected either way.
pub fn annotate(
    frame: &Frame,
    report: &OccupancyReport,
    detections: &[Detection],
    show_original: bool,
) -> Frame {
    let mut pixels = frame.to_rgb_vec();
    if !show_original {
        for zone in &report.zones {
            let color = match zone.state {
                ZoneState::Occupied => COLOR_OCCUPIED,
                ZoneState::Free => COLOR_FREE,
                ZoneState::Unknown => COLOR_UNKNOWN,
            };
            stroke_rect(&mut pixels, frame.width, frame.height, &zone.geometry, ZONE_STROKE, color);
        }
        for detection in detections {
            stroke_rect(
                &mut pixels,
                frame.width,
                frame.height,
                &detection.rect,
                DETECTION_STROKE,
                COLOR_DETECTION,
            );
        }
    }
    Frame::new(pixels, frame.width, frame.height, frame.index)
}

/// Stroke a rectangle outline, clipped to the frame.
fn stroke_rect(pixels: &mut [u8], width: u32, height: u32, rect: &Rect, thickness: u32, rgb: [u8; 3]) {
    let x1 = rect.x.min(width);
    let y1 = rect.y.min(height);
    let x2 = rect.right().min(width);
    let y2 = rect.bottom().min(height);
    if x1 >= x2 || y1 >= y2 {
        return;
    }

    let t = thickness.max(1);
    for y in y1..y2 {
        for x in x1..x2 {
            let on_border = x < x1 + t || x >= x2.saturating_sub(t) || y < y1 + t || y >= y2.saturating_sub(t);
            if on_border {
                let offset = ((y as usize) * (width as usize) + x as usize) * 3;
                pixels[offset..offset + 3].copy_from_slice(&rgb);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ZoneReading;

    fn blank_frame() -> Frame {
        Frame::new(vec![0u8; 100 * 100 * 3], 100, 100, 7)
    }

    fn report() -> OccupancyReport {
        OccupancyReport {
            frame_index: 7,
            zones: vec![ZoneReading {
                id: 0,
                geometry: Rect::new(10, 10, 40, 40),
                state: ZoneState::Occupied,
            }],
            occupied_count: 1,
            free_count: 0,
        }
    }

    #[test]
    fn show_original_returns_untouched_copy() {
        let frame = blank_frame();
        let annotated = annotate(&frame, &report(), &[], true);
        assert_eq!(annotated.pixels(), frame.pixels());
        assert_eq!(annotated.index, frame.index);
    }

    #[test]
    fn occupied_zone_border_is_stroked() {
        let frame = blank_frame();
        let annotated = annotate(&frame, &report(), &[], false);
        // Top-left corner pixel of the zone border.
        let offset = (10 * 100 + 10) * 3;
        assert_eq!(&annotated.pixels()[offset..offset + 3], &COLOR_OCCUPIED);
        // Zone interior stays untouched.
        let interior = (30 * 100 + 30) * 3;
        assert_eq!(&annotated.pixels()[interior..interior + 3], &[0, 0, 0]);
        // Source frame is never mutated.
        assert_eq!(&frame.pixels()[offset..offset + 3], &[0, 0, 0]);
    }
}
