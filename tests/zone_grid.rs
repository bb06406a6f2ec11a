use parkwatch::{build_zones, PipelineError};

/// Zones must tile the frame: exact count, no pairwise overlap, full cover.
#[test]
fn grid_tiles_frame_for_every_valid_count() {
    for zone_count in 4..=12u32 {
        for (w, h) in [(640, 480), (1920, 1080), (333, 217)] {
            let zones = build_zones(w, h, zone_count).unwrap();
            assert_eq!(zones.len(), zone_count as usize, "count for n={zone_count}");

            // Ids are 0..n in order.
            for (i, zone) in zones.iter().enumerate() {
                assert_eq!(zone.id, i as u32);
            }

            // Pairwise non-overlapping.
            for a in &zones {
                for b in &zones {
                    if a.id != b.id {
                        assert!(
                            a.rect.intersection(&b.rect).is_none(),
                            "zones {} and {} overlap for n={zone_count} {w}x{h}",
                            a.id,
                            b.id
                        );
                    }
                }
            }

            // Union covers the frame: with no overlap, the areas must sum to
            // the full frame area.
            let total: u64 = zones.iter().map(|z| z.rect.area()).sum();
            assert_eq!(total, w as u64 * h as u64, "cover for n={zone_count} {w}x{h}");
        }
    }
}

#[test]
fn identical_inputs_yield_identical_grids() {
    let a = build_zones(1280, 720, 9).unwrap();
    let b = build_zones(1280, 720, 9).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_counts_and_dimensions_are_rejected() {
    for (w, h, n) in [(640, 480, 0), (640, 480, 3), (640, 480, 13), (0, 480, 6), (640, 0, 6)] {
        assert!(
            matches!(
                build_zones(w, h, n),
                Err(PipelineError::InvalidConfiguration(_))
            ),
            "expected rejection for {w}x{h} n={n}"
        );
    }
}
