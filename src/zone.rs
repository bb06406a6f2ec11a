//! Zone grid construction.
//!
//! A zone is one parking slot: a fixed rectangular region of the frame with a
//! stable integer id. The grid is built once per session from the first
//! frame's dimensions and never changes afterwards (no mid-session
//! re-calibration). `build_zones` is deterministic: identical inputs always
//! yield identical geometry and ids.

use crate::{PipelineError, Rect};

/// Inclusive bounds for the configurable zone count.
pub const MIN_ZONE_COUNT: u32 = 4;
pub const MAX_ZONE_COUNT: u32 = 12;

/// One parking slot. Geometry is immutable for the lifetime of a run;
/// occupancy state lives in the stabilizer, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zone {
    pub id: u32,
    pub rect: Rect,
}

/// Partition a frame into `zone_count` non-overlapping rectangular zones.
///
/// The frame is sliced into a rows x cols grid chosen so that rows * cols
/// equals `zone_count` with the most square cells possible. Ids are assigned
/// in row-major order, left-to-right, top-to-bottom. Integer-division
/// remainders are absorbed by the last column and last row, so the union of
/// all zones covers the frame exactly.
pub fn build_zones(
    frame_width: u32,
    frame_height: u32,
    zone_count: u32,
) -> Result<Vec<Zone>, PipelineError> {
    if frame_width == 0 || frame_height == 0 {
        return Err(PipelineError::InvalidConfiguration(format!(
            "frame dimensions must be positive (got {}x{})",
            frame_width, frame_height
        )));
    }
    if !(MIN_ZONE_COUNT..=MAX_ZONE_COUNT).contains(&zone_count) {
        return Err(PipelineError::InvalidConfiguration(format!(
            "zone_count must be in [{}, {}] (got {})",
            MIN_ZONE_COUNT, MAX_ZONE_COUNT, zone_count
        )));
    }

    let (rows, cols) = grid_shape(zone_count);
    let cell_w = frame_width / cols;
    let cell_h = frame_height / rows;

    let mut zones = Vec::with_capacity(zone_count as usize);
    for row in 0..rows {
        for col in 0..cols {
            let id = row * cols + col;
            if id >= zone_count {
                break;
            }
            let x = col * cell_w;
            let y = row * cell_h;
            // Last column/row absorbs the remainder pixels.
            let w = if col + 1 == cols { frame_width - x } else { cell_w };
            let h = if row + 1 == rows { frame_height - y } else { cell_h };
            zones.push(Zone {
                id,
                rect: Rect::new(x, y, w, h),
            });
        }
    }
    Ok(zones)
}

/// Near-square rows x cols factorization of `zone_count`.
///
/// Starting from rows = ceil(sqrt(n)), every row count is considered and the
/// shape with the fewest wasted cells wins; ties go to the shape closest to
/// square, then to fewer rows (wide layouts suit landscape frames). For every
/// count in the supported [4, 12] range this yields an exact factorization,
/// so no cell is ever wasted.
fn grid_shape(zone_count: u32) -> (u32, u32) {
    let mut best: Option<(u32, u32, u32)> = None; // (waste, aspect_gap, rows)
    for rows in 1..=zone_count {
        let cols = zone_count.div_ceil(rows);
        let waste = rows * cols - zone_count;
        let aspect_gap = rows.abs_diff(cols);
        let key = (waste, aspect_gap, rows);
        if best.map_or(true, |b| key < b) {
            best = Some(key);
        }
    }
    let (_, _, rows) = best.unwrap_or((0, 0, 1));
    (rows, zone_count.div_ceil(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_zones_form_two_by_three_grid() {
        assert_eq!(grid_shape(6), (2, 3));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(9), (3, 3));
        assert_eq!(grid_shape(12), (3, 4));
    }

    #[test]
    fn prime_counts_fall_back_to_strips() {
        // 5, 7, 11 only factor as 1 x n; a strip wastes no cells.
        assert_eq!(grid_shape(5), (1, 5));
        assert_eq!(grid_shape(7), (1, 7));
        assert_eq!(grid_shape(11), (1, 11));
    }

    #[test]
    fn remainder_pixels_go_to_last_column_and_row() {
        let zones = build_zones(641, 481, 6).unwrap();
        // 2x3 grid: base cell 213x240, last column is 215 wide, last row 241 tall.
        assert_eq!(zones[0].rect, Rect::new(0, 0, 213, 240));
        assert_eq!(zones[2].rect, Rect::new(426, 0, 215, 240));
        assert_eq!(zones[5].rect, Rect::new(426, 240, 215, 241));
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert!(matches!(
            build_zones(640, 480, 3),
            Err(PipelineError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            build_zones(640, 480, 13),
            Err(PipelineError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            build_zones(0, 480, 6),
            Err(PipelineError::InvalidConfiguration(_))
        ));
    }
}
