//! Temporal stabilization of raw occupancy decisions.
//!
//! Raw per-frame states flicker: one missed detection reads as a free slot,
//! one spurious box as an occupied one. Each zone owns a fixed-length ring of
//! its most recent raw states and reports the majority vote over that window.
//! Even splits resolve to the previous committed state (hysteresis) so a zone
//! sitting on the decision boundary does not oscillate; with no committed
//! state yet, a tie reads `Free` - assume empty until evidence accumulates.

use std::collections::VecDeque;

use crate::ZoneState;

/// Default stabilization window length.
pub const DEFAULT_WINDOW: usize = 5;

/// Majority-vote smoother for one zone.
pub struct ZoneStabilizer {
    window: VecDeque<ZoneState>,
    capacity: usize,
    /// Last state committed from a full window; tie-break anchor.
    committed: Option<ZoneState>,
    /// Last reported state, `Unknown` before the first sample.
    current: ZoneState,
}

impl ZoneStabilizer {
    pub fn new(window: usize) -> Self {
        let capacity = window.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            committed: None,
            current: ZoneState::Unknown,
        }
    }

    /// Feed one raw sample and return the stabilized state.
    pub fn push(&mut self, raw: ZoneState) -> ZoneState {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(raw);

        let occupied = self
            .window
            .iter()
            .filter(|s| **s == ZoneState::Occupied)
            .count();
        let free = self.window.len() - occupied;

        let state = if occupied > free {
            ZoneState::Occupied
        } else if free > occupied {
            ZoneState::Free
        } else {
            self.committed.unwrap_or(ZoneState::Free)
        };

        // Hysteresis anchors only on full-window votes; a tie during warm-up
        // stays conservative rather than locking in an early guess.
        if self.window.len() == self.capacity {
            self.committed = Some(state);
        }
        self.current = state;
        state
    }

    /// Current stabilized state without feeding a sample.
    pub fn state(&self) -> ZoneState {
        self.current
    }

    /// Number of samples currently in the window.
    pub fn samples(&self) -> usize {
        self.window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZoneState::{Free, Occupied, Unknown};

    fn run(window: usize, raw: &[ZoneState]) -> ZoneState {
        let mut stabilizer = ZoneStabilizer::new(window);
        let mut last = Unknown;
        for &state in raw {
            last = stabilizer.push(state);
        }
        last
    }

    #[test]
    fn majority_three_of_five_is_occupied() {
        assert_eq!(run(5, &[Occupied, Free, Occupied, Free, Occupied]), Occupied);
    }

    #[test]
    fn even_split_with_no_prior_defaults_to_free() {
        assert_eq!(run(4, &[Occupied, Free, Occupied, Free]), Free);
    }

    #[test]
    fn tie_holds_previous_committed_state() {
        let mut stabilizer = ZoneStabilizer::new(4);
        for _ in 0..4 {
            stabilizer.push(Occupied);
        }
        assert_eq!(stabilizer.state(), Occupied);
        // Two free samples bring the window to an even split; the committed
        // occupied state holds.
        stabilizer.push(Free);
        assert_eq!(stabilizer.push(Free), Occupied);
        // A third free sample tips the majority.
        assert_eq!(stabilizer.push(Free), Free);
    }

    #[test]
    fn single_flicker_does_not_flip_state() {
        let mut stabilizer = ZoneStabilizer::new(5);
        for _ in 0..5 {
            stabilizer.push(Occupied);
        }
        // One missed detection in a long occupied run.
        assert_eq!(stabilizer.push(Free), Occupied);
        assert_eq!(stabilizer.push(Occupied), Occupied);
    }

    #[test]
    fn unknown_until_first_sample() {
        let stabilizer = ZoneStabilizer::new(5);
        assert_eq!(stabilizer.state(), Unknown);
        let mut stabilizer = ZoneStabilizer::new(5);
        assert_eq!(stabilizer.push(Occupied), Occupied);
    }

    #[test]
    fn sample_count_tracks_window_fill_and_caps_at_capacity() {
        let mut stabilizer = ZoneStabilizer::new(3);
        assert_eq!(stabilizer.samples(), 0);
        stabilizer.push(Occupied);
        assert_eq!(stabilizer.samples(), 1);
        stabilizer.push(Free);
        stabilizer.push(Occupied);
        assert_eq!(stabilizer.samples(), 3);
        // The ring drops the oldest sample; the count stays at capacity.
        stabilizer.push(Free);
        assert_eq!(stabilizer.samples(), 3);
    }
}
