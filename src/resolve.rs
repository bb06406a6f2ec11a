//! Detection-to-zone occupancy resolution.
//!
//! For each zone the resolver computes the overlap ratio of every detection
//! (intersection area / zone area) and compares the maximum against the
//! configured overlap threshold. Occupancy is zone-local: a detection that
//! straddles a boundary may mark more than one zone, and nothing assigns a
//! vehicle exclusively to a single slot. That is intentional - the question
//! answered here is "is this slot covered", not "which slot does this vehicle
//! belong to".

use crate::detect::Detection;
use crate::zone::Zone;
use crate::ZoneState;

/// Default fraction of a zone that must be covered before it reads occupied.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.3;

/// Resolve raw per-frame occupancy for every zone.
///
/// Returns one raw state per zone, in the same order as `zones`. Pure: no
/// state is retained between calls, and ties between detections are
/// irrelevant because only the maximum overlap ratio per zone matters.
pub fn resolve_occupancy(
    zones: &[Zone],
    detections: &[Detection],
    overlap_threshold: f32,
) -> Vec<ZoneState> {
    zones
        .iter()
        .map(|zone| {
            let max_ratio = detections
                .iter()
                .filter_map(|d| d.rect.intersection(&zone.rect))
                .map(|overlap| overlap.area() as f64 / zone.rect.area() as f64)
                .fold(0.0_f64, f64::max);
            if max_ratio > overlap_threshold as f64 {
                ZoneState::Occupied
            } else {
                ZoneState::Free
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::VehicleClass;
    use crate::zone::build_zones;
    use crate::Rect;

    fn car(rect: Rect) -> Detection {
        Detection {
            rect,
            class: VehicleClass::Car,
            confidence: 0.9,
        }
    }

    #[test]
    fn contained_detection_occupies_zone() {
        let zones = build_zones(600, 400, 4).unwrap();
        // Zone 0 is (0,0,300,200); a box covering all of it has ratio 1.0.
        let states = resolve_occupancy(&zones, &[car(Rect::new(0, 0, 300, 200))], 0.3);
        assert_eq!(states[0], ZoneState::Occupied);
        assert!(states[1..].iter().all(|s| *s == ZoneState::Free));
    }

    #[test]
    fn detection_outside_all_zones_leaves_everything_free() {
        let zones = build_zones(600, 400, 4).unwrap();
        let states = resolve_occupancy(&zones, &[car(Rect::new(700, 500, 50, 50))], 0.3);
        assert!(states.iter().all(|s| *s == ZoneState::Free));
    }

    #[test]
    fn small_overlap_stays_below_threshold() {
        let zones = build_zones(600, 400, 4).unwrap();
        // 50x50 box in a 300x200 zone: ratio ~0.042.
        let states = resolve_occupancy(&zones, &[car(Rect::new(10, 10, 50, 50))], 0.3);
        assert_eq!(states[0], ZoneState::Free);
    }

    #[test]
    fn straddling_detection_may_claim_both_zones() {
        let zones = build_zones(600, 400, 4).unwrap();
        // Box centered on the vertical boundary at x=300, covering a large
        // share of zones 0 and 1.
        let states = resolve_occupancy(&zones, &[car(Rect::new(100, 0, 400, 200))], 0.3);
        assert_eq!(states[0], ZoneState::Occupied);
        assert_eq!(states[1], ZoneState::Occupied);
    }

    #[test]
    fn only_max_ratio_matters_no_double_counting() {
        let zones = build_zones(600, 400, 4).unwrap();
        // Two boxes each covering 20% of zone 0: neither reaches the 0.3
        // threshold, and their ratios do not accumulate.
        let states = resolve_occupancy(
            &zones,
            &[
                car(Rect::new(0, 0, 150, 80)),
                car(Rect::new(150, 100, 150, 80)),
            ],
            0.3,
        );
        assert_eq!(states[0], ZoneState::Free);
    }
}
