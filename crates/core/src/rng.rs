//! RNG module - seeded lane picking for forced drops
//!
//! The generator is a plain value threaded by the caller; there is no global state.
//! Same seed, same lane sequence.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::LANE_COUNT;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales from the high bits; the low bits of a power-of-two LCG cycle with
    /// a tiny period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (for snapshots and replays)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Pick the next forced-drop lane.
///
/// Draws uniformly from every lane except `exclude`, so the same lane never
/// receives two forced drops in a row.
pub fn pick_next_lane(rng: &mut SimpleRng, exclude: Option<usize>) -> usize {
    let candidates = match exclude {
        Some(ex) if ex < LANE_COUNT => LANE_COUNT - 1,
        _ => LANE_COUNT,
    };
    let mut lane = rng.next_range(candidates as u32) as usize;
    if let Some(ex) = exclude.filter(|&ex| ex < LANE_COUNT) {
        if lane >= ex {
            lane += 1;
        }
    }
    trace!(lane, ?exclude, "picked drop lane");
    lane
}
